use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum OAuth2Error {
    #[error("Id token error: {0}")]
    IdToken(String),

    #[error("JWKS fetch error: {0}")]
    JwksFetch(String),

    #[error("No matching key found in JWKS")]
    NoMatchingKey,

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Missing key component: {0}")]
    MissingKeyComponent(String),
}
