//! Database table configuration

use std::env;
use std::sync::LazyLock;

/// Table prefix from environment variable
pub static TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "campus_".to_string()));

/// Users table name
pub static DB_TABLE_USERS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_USERS").unwrap_or_else(|_| format!("{}{}", *TABLE_PREFIX, "users"))
});

/// Credentials table name
pub static DB_TABLE_CREDENTIALS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_CREDENTIALS")
        .unwrap_or_else(|_| format!("{}{}", *TABLE_PREFIX, "credentials"))
});

/// Student profiles table name
pub static DB_TABLE_STUDENT_PROFILES: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_STUDENT_PROFILES")
        .unwrap_or_else(|_| format!("{}{}", *TABLE_PREFIX, "student_profiles"))
});

/// Verification tokens table name
pub static DB_TABLE_VERIFICATION_TOKENS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_VERIFICATION_TOKENS")
        .unwrap_or_else(|_| format!("{}{}", *TABLE_PREFIX, "verification_tokens"))
});

/// Refresh tokens table name
pub static DB_TABLE_REFRESH_TOKENS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_REFRESH_TOKENS")
        .unwrap_or_else(|_| format!("{}{}", *TABLE_PREFIX, "refresh_tokens"))
});

#[cfg(test)]
mod tests {
    use std::env;

    #[test]
    fn test_db_table_prefix_default() {
        let original = env::var("DB_TABLE_PREFIX").ok();
        unsafe {
            env::remove_var("DB_TABLE_PREFIX");
        }

        let prefix = env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "campus_".to_string());
        assert_eq!(prefix, "campus_");

        if let Some(value) = original {
            unsafe {
                env::set_var("DB_TABLE_PREFIX", value);
            }
        }
    }
}
