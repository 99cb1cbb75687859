use std::env;
use std::sync::LazyLock;

/// Verification token lifetime in seconds. Default 1 hour.
pub static VERIFICATION_TOKEN_TTL: LazyLock<i64> = LazyLock::new(|| {
    env::var("VERIFICATION_TOKEN_TTL")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3600)
});
