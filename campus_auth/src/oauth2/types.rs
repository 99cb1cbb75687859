use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub(super) struct Jwks {
    pub keys: Vec<Jwk>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub(super) struct Jwk {
    pub kty: String,
    pub kid: String,
    pub alg: Option<String>,
    pub n: Option<String>,
    pub e: Option<String>,
}

/// Verified claim set of a Google ID token. Only the fields the provisioning
/// flow consumes; everything else in the assertion is ignored.
#[allow(unused)]
#[derive(Debug, Deserialize, Clone)]
pub struct IdInfo {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub email: String,
    pub email_verified: Option<bool>,
    pub name: String,
    pub picture: Option<String>,
    pub iat: i64,
    pub exp: i64,
}
