//! Stateless HS256 signer for session and completion tokens.
//!
//! Validity of an access token is purely cryptographic plus TTL; refresh
//! tokens additionally require a live store record, checked by the caller.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::config::AUTH_SERVER_SECRET;
use super::errors::TokenError;
use super::types::{CompletionClaims, SessionClaims};

fn encoding_key() -> EncodingKey {
    EncodingKey::from_secret(&AUTH_SERVER_SECRET)
}

fn decoding_key() -> DecodingKey {
    DecodingKey::from_secret(&AUTH_SERVER_SECRET)
}

fn validation() -> Validation {
    // Default validation checks exp with a small leeway; the exp claim is
    // required for every token this crate issues.
    Validation::new(Algorithm::HS256)
}

pub fn sign_session_token(claims: &SessionClaims) -> Result<String, TokenError> {
    encode(&Header::new(Algorithm::HS256), claims, &encoding_key())
        .map_err(|e| TokenError::Signing(e.to_string()))
}

pub fn verify_session_token(token: &str) -> Result<SessionClaims, TokenError> {
    decode::<SessionClaims>(token, &decoding_key(), &validation())
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Session token verification failed: {}", e);
            TokenError::InvalidOrExpired
        })
}

pub fn sign_completion_token(claims: &CompletionClaims) -> Result<String, TokenError> {
    encode(&Header::new(Algorithm::HS256), claims, &encoding_key())
        .map_err(|e| TokenError::Signing(e.to_string()))
}

pub fn verify_completion_token(token: &str) -> Result<CompletionClaims, TokenError> {
    decode::<CompletionClaims>(token, &decoding_key(), &validation())
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Completion token verification failed: {}", e);
            TokenError::InvalidOrExpired
        })
}
