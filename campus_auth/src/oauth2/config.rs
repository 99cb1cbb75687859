use std::env;
use std::sync::LazyLock;

/// OAuth2 client id the ID token must be issued for. Required as soon as the
/// first federated sign-in is attempted.
pub(super) static OAUTH2_GOOGLE_CLIENT_ID: LazyLock<String> = LazyLock::new(|| {
    env::var("OAUTH2_GOOGLE_CLIENT_ID").expect("OAUTH2_GOOGLE_CLIENT_ID must be set")
});

/// Where Google publishes its signing keys.
pub(super) static GOOGLE_JWKS_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("GOOGLE_JWKS_URL")
        .unwrap_or_else(|_| "https://www.googleapis.com/oauth2/v3/certs".to_string())
});

/// Issuer values Google uses for ID tokens.
pub(super) const GOOGLE_ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];
