use thiserror::Error;

use crate::oauth2::OAuth2Error;
use crate::password::PasswordError;
use crate::registration::RegistrationError;
use crate::session::SessionError;
use crate::token::TokenError;
use crate::userdb::UserError;
use crate::utils::UtilError;

/// Error type of every flow operation. The first group maps 1:1 to responses
/// the embedding application returns to clients; `Database` and `Internal`
/// are infrastructure failures and must never be presented as a client
/// mistake.
#[derive(Debug, Error)]
pub enum AuthFlowError {
    #[error("Email already registered")]
    AlreadyRegistered,

    #[error("Invalid or expired verification token")]
    InvalidOrExpiredToken,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    InvalidState(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email not verified")]
    EmailNotVerified,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Invalid Google ID token")]
    InvalidFederatedToken,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthFlowError {
    /// Log the error and pass it through, so flow code can attach logging at
    /// the point a request-level error is raised.
    pub(crate) fn log(self) -> Self {
        tracing::debug!("Auth flow error: {:?}", self);
        self
    }
}

impl From<UserError> for AuthFlowError {
    fn from(err: UserError) -> Self {
        tracing::error!("User store error: {}", err);
        AuthFlowError::Database(err.to_string())
    }
}

impl From<RegistrationError> for AuthFlowError {
    fn from(err: RegistrationError) -> Self {
        tracing::error!("Verification token store error: {}", err);
        AuthFlowError::Database(err.to_string())
    }
}

impl From<SessionError> for AuthFlowError {
    fn from(err: SessionError) -> Self {
        tracing::error!("Refresh token store error: {}", err);
        AuthFlowError::Database(err.to_string())
    }
}

impl From<TokenError> for AuthFlowError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidOrExpired => AuthFlowError::InvalidOrExpiredToken.log(),
            TokenError::Signing(msg) => {
                tracing::error!("Token signing error: {}", msg);
                AuthFlowError::Internal(msg)
            }
        }
    }
}

impl From<PasswordError> for AuthFlowError {
    fn from(err: PasswordError) -> Self {
        tracing::error!("Password hashing error: {}", err);
        AuthFlowError::Internal(err.to_string())
    }
}

impl From<UtilError> for AuthFlowError {
    fn from(err: UtilError) -> Self {
        tracing::error!("Utility error: {}", err);
        AuthFlowError::Internal(err.to_string())
    }
}

impl From<OAuth2Error> for AuthFlowError {
    fn from(err: OAuth2Error) -> Self {
        match err {
            // Key fetch failures are our infrastructure, not the caller's token
            OAuth2Error::JwksFetch(msg) => {
                tracing::error!("JWKS fetch error: {}", msg);
                AuthFlowError::Internal(msg)
            }
            other => {
                tracing::debug!("ID token rejected: {}", other);
                AuthFlowError::InvalidFederatedToken
            }
        }
    }
}
