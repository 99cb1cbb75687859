//! campus_auth - Account and session lifecycle for the campus delivery backend
//!
//! This crate owns email-verified registration, password and Google sign-in,
//! and access/refresh token issuance, refresh and revocation. HTTP routing and
//! the order-management models live in the embedding application; they consume
//! the flow functions re-exported here.

mod config;
mod coordination;
mod notify;
mod oauth2;
mod password;
mod registration;
mod session;
mod storage;
mod token;
mod userdb;
mod utils;

#[cfg(test)]
mod test_utils;

// Flow operations, consumed by the HTTP controllers
pub use coordination::{
    AuthFlowError, CompleteRegistrationRequest, RoleProfile, SignInResult, TokenPair, UserInfo,
    complete_registration, generate_tokens, initiate_registration, refresh_tokens, sign_in,
    sign_in_with_google, sign_out, verify_email,
};

pub use notify::{LoggingMailer, LoggingNotifier, PushMessage, PushNotifier, VerificationMailer};
pub use oauth2::IdInfo;
pub use session::RefreshTokenRecord;
pub use token::SessionClaims;
pub use userdb::{Credential, StudentProfile, User, UserRole};

/// Initialize the backing stores. Call once at application startup, before
/// serving any request that reaches an auth flow.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    userdb::init().await?;
    registration::init().await?;
    session::init().await?;
    Ok(())
}
