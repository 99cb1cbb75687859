use chrono::{DateTime, Utc};

use crate::session::errors::SessionError;
use crate::session::types::RefreshTokenRecord;
use crate::storage::GENERIC_DATA_STORE;

use super::postgres::*;
use super::sqlite::*;

pub struct RefreshTokenStore;

impl RefreshTokenStore {
    /// Initialize the refresh token table
    pub async fn init() -> Result<(), SessionError> {
        let store = GENERIC_DATA_STORE.lock().await;

        match (store.as_sqlite(), store.as_postgres()) {
            (Some(pool), _) => create_tables_sqlite(pool).await,
            (_, Some(pool)) => create_tables_postgres(pool).await,
            _ => Err(SessionError::Storage(
                "Unsupported database type".to_string(),
            )),
        }
    }

    /// Persist a newly issued refresh token
    pub async fn create(
        token: &str,
        user_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            create_refresh_token_sqlite(pool, token, user_id, expires_at).await
        } else if let Some(pool) = store.as_postgres() {
            create_refresh_token_postgres(pool, token, user_id, expires_at).await
        } else {
            Err(SessionError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    /// Look up a refresh token record by its token string
    pub async fn get(token: &str) -> Result<Option<RefreshTokenRecord>, SessionError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_refresh_token_sqlite(pool, token).await
        } else if let Some(pool) = store.as_postgres() {
            get_refresh_token_postgres(pool, token).await
        } else {
            Err(SessionError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    /// Delete a refresh token record; returns whether a row was removed
    pub async fn delete(token: &str) -> Result<bool, SessionError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            delete_refresh_token_sqlite(pool, token).await
        } else if let Some(pool) = store.as_postgres() {
            delete_refresh_token_postgres(pool, token).await
        } else {
            Err(SessionError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }
}
