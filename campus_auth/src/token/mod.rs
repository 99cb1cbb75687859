mod config;
mod errors;
mod signer;
mod types;

pub use config::{ACCESS_TOKEN_TTL, COMPLETION_TOKEN_TTL, REFRESH_TOKEN_TTL};
pub use errors::TokenError;
pub use signer::{
    sign_completion_token, sign_session_token, verify_completion_token, verify_session_token,
};
pub use types::{CompletionClaims, SessionClaims};
