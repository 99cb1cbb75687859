use std::env;
use std::sync::LazyLock;

/// HMAC secret for all signed tokens. Shared by access, refresh and
/// completion tokens; rotation invalidates everything outstanding.
pub(super) static AUTH_SERVER_SECRET: LazyLock<Vec<u8>> =
    LazyLock::new(|| match env::var("AUTH_SERVER_SECRET") {
        Ok(secret) => secret.into_bytes(),
        Err(_) => "default_secret_key_change_in_production"
            .to_string()
            .into_bytes(),
    });

/// Access token lifetime in seconds. Default 45 minutes.
pub static ACCESS_TOKEN_TTL: LazyLock<i64> = LazyLock::new(|| {
    env::var("ACCESS_TOKEN_TTL")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(45 * 60)
});

/// Refresh token lifetime in seconds. Default 7 days.
pub static REFRESH_TOKEN_TTL: LazyLock<i64> = LazyLock::new(|| {
    env::var("REFRESH_TOKEN_TTL")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(7 * 24 * 60 * 60)
});

/// Completion token lifetime in seconds. Default 1 hour.
pub static COMPLETION_TOKEN_TTL: LazyLock<i64> = LazyLock::new(|| {
    env::var("COMPLETION_TOKEN_TTL")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(60 * 60)
});
