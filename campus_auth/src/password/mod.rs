//! Password hashing with Argon2id.
//!
//! Hashes are stored in PHC string format, so the parameters and salt travel
//! with the hash and verification needs no extra configuration. The time cost
//! is configurable through `PASSWORD_HASH_COST`.

use argon2::{
    Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::env;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum PasswordError {
    #[error("Hashing error: {0}")]
    Hashing(String),
}

/// Argon2 time cost (iterations). Default 3, per OWASP guidance.
static PASSWORD_HASH_COST: LazyLock<u32> = LazyLock::new(|| {
    env::var("PASSWORD_HASH_COST")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3)
});

fn argon2_instance() -> Argon2<'static> {
    let params = Params::new(
        64 * 1024,            // m_cost: 64 MiB
        *PASSWORD_HASH_COST,  // t_cost
        1,                    // p_cost
        None,
    )
    .expect("Invalid Argon2 parameters");

    Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params)
}

/// Hash a password with Argon2id and a random salt, returning the PHC string.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    argon2_instance()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hashing(e.to_string()))
}

/// Verify a password against a stored PHC hash. Comparison inside the
/// verifier is constant-time.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::Hashing(format!("Invalid hash format: {e}")))?;

    match argon2_instance().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Hashing(e.to_string())),
    }
}
