use chrono::{DateTime, Utc};

use crate::registration::errors::RegistrationError;
use crate::storage::GENERIC_DATA_STORE;

use super::postgres::*;
use super::sqlite::*;

pub struct VerificationTokenStore;

impl VerificationTokenStore {
    /// Initialize the verification token table
    pub async fn init() -> Result<(), RegistrationError> {
        let store = GENERIC_DATA_STORE.lock().await;

        match (store.as_sqlite(), store.as_postgres()) {
            (Some(pool), _) => create_tables_sqlite(pool).await,
            (_, Some(pool)) => create_tables_postgres(pool).await,
            _ => Err(RegistrationError::Storage(
                "Unsupported database type".to_string(),
            )),
        }
    }

    /// Replace (or create) the verification token for a user. Any previously
    /// issued token for that user becomes permanently invalid.
    pub async fn upsert_token(
        user_id: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RegistrationError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            upsert_token_sqlite(pool, user_id, token, expires_at).await
        } else if let Some(pool) = store.as_postgres() {
            upsert_token_postgres(pool, user_id, token, expires_at).await
        } else {
            Err(RegistrationError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    /// Atomically consume a token: delete it if it matches and has not
    /// expired, returning the owning user id. Expired or unknown tokens
    /// return None and are left for the upsert path to overwrite.
    pub async fn consume_token(
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<String>, RegistrationError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            consume_token_sqlite(pool, token, now).await
        } else if let Some(pool) = store.as_postgres() {
            consume_token_postgres(pool, token, now).await
        } else {
            Err(RegistrationError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }
}
