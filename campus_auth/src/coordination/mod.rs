//! Flow orchestration across the userdb, registration, session, token,
//! password, oauth2 and notify modules.
//!
//! Each public function here is one operation the embedding application's
//! HTTP controllers expose. The lower modules never call each other; all
//! cross-module sequencing lives in this layer.

mod errors;
mod registration;
mod session;
mod user;

pub use errors::AuthFlowError;
pub use registration::{
    CompleteRegistrationRequest, complete_registration, initiate_registration, verify_email,
};
pub use session::{
    RoleProfile, SignInResult, TokenPair, UserInfo, generate_tokens, refresh_tokens, sign_in,
    sign_in_with_google, sign_out,
};
