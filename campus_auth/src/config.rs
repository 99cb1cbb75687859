//! Central configuration for the campus_auth crate

use std::sync::LazyLock;

/// Base URL of the backend, used to build verification links.
///
/// The verification endpoint is mounted by the embedding application under
/// `/api/auth/signup/verify`.
pub static APP_URL: LazyLock<String> =
    LazyLock::new(|| std::env::var("APP_URL").unwrap_or_else(|_| "http://localhost:8080".to_string()));

/// Web frontend page that finishes signup; receives the completion token as a
/// query parameter.
pub static FRONTEND_URL_COMPLETE_SIGNUP: LazyLock<String> = LazyLock::new(|| {
    std::env::var("FRONTEND_URL_COMPLETE_SIGNUP")
        .unwrap_or_else(|_| "http://localhost:3000/complete-signup".to_string())
});

/// Mobile deep link base that finishes signup; receives the completion token
/// as the final path segment.
pub static MOBILE_URL_COMPLETE_SIGNUP: LazyLock<String> = LazyLock::new(|| {
    std::env::var("MOBILE_URL_COMPLETE_SIGNUP")
        .unwrap_or_else(|_| "campusdelivery://complete-signup".to_string())
});

#[cfg(test)]
mod tests {
    use std::env;

    #[test]
    fn test_app_url_default() {
        // The LazyLock may already be initialized, so test the fallback logic
        // it uses rather than the static itself.
        let original = env::var("APP_URL").ok();
        unsafe {
            env::remove_var("APP_URL");
        }

        let url = env::var("APP_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
        assert_eq!(url, "http://localhost:8080");

        if let Some(value) = original {
            unsafe {
                env::set_var("APP_URL", value);
            }
        }
    }

    #[test]
    fn test_complete_signup_url_custom() {
        let original = env::var("FRONTEND_URL_COMPLETE_SIGNUP").ok();
        unsafe {
            env::set_var("FRONTEND_URL_COMPLETE_SIGNUP", "https://app.example/finish");
        }

        let url = env::var("FRONTEND_URL_COMPLETE_SIGNUP")
            .unwrap_or_else(|_| "http://localhost:3000/complete-signup".to_string());
        assert_eq!(url, "https://app.example/finish");

        unsafe {
            match original {
                Some(value) => env::set_var("FRONTEND_URL_COMPLETE_SIGNUP", value),
                None => env::remove_var("FRONTEND_URL_COMPLETE_SIGNUP"),
            }
        }
    }
}
