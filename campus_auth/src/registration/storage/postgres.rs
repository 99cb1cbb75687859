use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::registration::errors::RegistrationError;
use crate::storage::DB_TABLE_VERIFICATION_TOKENS;

// PostgreSQL implementations
pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), RegistrationError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            user_id TEXT PRIMARY KEY NOT NULL,
            token TEXT NOT NULL,
            expires_at TIMESTAMPTZ NOT NULL
        )
        "#,
        DB_TABLE_VERIFICATION_TOKENS.as_str()
    ))
    .execute(pool)
    .await
    .map_err(|e| RegistrationError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn upsert_token_postgres(
    pool: &Pool<Postgres>,
    user_id: &str,
    token: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), RegistrationError> {
    sqlx::query(&format!(
        r#"
        INSERT INTO {} (user_id, token, expires_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id) DO UPDATE SET
            token = excluded.token,
            expires_at = excluded.expires_at
        "#,
        DB_TABLE_VERIFICATION_TOKENS.as_str()
    ))
    .bind(user_id)
    .bind(token)
    .bind(expires_at)
    .execute(pool)
    .await
    .map_err(|e| RegistrationError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn consume_token_postgres(
    pool: &Pool<Postgres>,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<String>, RegistrationError> {
    // Expiry is strict: a token presented at exactly expires_at is rejected.
    let row: Option<(String,)> = sqlx::query_as(&format!(
        r#"
        DELETE FROM {} WHERE token = $1 AND expires_at > $2 RETURNING user_id
        "#,
        DB_TABLE_VERIFICATION_TOKENS.as_str()
    ))
    .bind(token)
    .bind(now)
    .fetch_optional(pool)
    .await
    .map_err(|e| RegistrationError::Storage(e.to_string()))?;

    Ok(row.map(|(user_id,)| user_id))
}
