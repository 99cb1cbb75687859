use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};

use crate::session::errors::SessionError;
use crate::session::types::RefreshTokenRecord;
use crate::storage::DB_TABLE_REFRESH_TOKENS;

// SQLite implementations
pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), SessionError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            token TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL,
            expires_at TIMESTAMP NOT NULL
        )
        "#,
        DB_TABLE_REFRESH_TOKENS.as_str()
    ))
    .execute(pool)
    .await
    .map_err(|e| SessionError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn create_refresh_token_sqlite(
    pool: &Pool<Sqlite>,
    token: &str,
    user_id: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), SessionError> {
    sqlx::query(&format!(
        r#"
        INSERT INTO {} (token, user_id, expires_at) VALUES (?, ?, ?)
        ON CONFLICT (token) DO UPDATE SET expires_at = excluded.expires_at
        "#,
        DB_TABLE_REFRESH_TOKENS.as_str()
    ))
    .bind(token)
    .bind(user_id)
    .bind(expires_at)
    .execute(pool)
    .await
    .map_err(|e| SessionError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn get_refresh_token_sqlite(
    pool: &Pool<Sqlite>,
    token: &str,
) -> Result<Option<RefreshTokenRecord>, SessionError> {
    sqlx::query_as::<_, RefreshTokenRecord>(&format!(
        r#"
        SELECT * FROM {} WHERE token = ?
        "#,
        DB_TABLE_REFRESH_TOKENS.as_str()
    ))
    .bind(token)
    .fetch_optional(pool)
    .await
    .map_err(|e| SessionError::Storage(e.to_string()))
}

pub(super) async fn delete_refresh_token_sqlite(
    pool: &Pool<Sqlite>,
    token: &str,
) -> Result<bool, SessionError> {
    let result = sqlx::query(&format!(
        r#"
        DELETE FROM {} WHERE token = ?
        "#,
        DB_TABLE_REFRESH_TOKENS.as_str()
    ))
    .bind(token)
    .execute(pool)
    .await
    .map_err(|e| SessionError::Storage(e.to_string()))?;

    Ok(result.rows_affected() > 0)
}
