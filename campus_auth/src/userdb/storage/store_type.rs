use chrono::{DateTime, Utc};

use crate::storage::GENERIC_DATA_STORE;
use crate::userdb::{
    errors::UserError,
    types::{Credential, ProfileUpdate, StudentProfile, User},
};

use super::postgres::*;
use super::sqlite::*;

pub struct UserStore;

impl UserStore {
    /// Initialize the user, credential and student profile tables
    pub async fn init() -> Result<(), UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        match (store.as_sqlite(), store.as_postgres()) {
            (Some(pool), _) => create_tables_sqlite(pool).await,
            (_, Some(pool)) => create_tables_postgres(pool).await,
            _ => Err(UserError::Storage("Unsupported database type".to_string())),
        }
    }

    /// Get a user by their ID
    pub async fn get_user(id: &str) -> Result<Option<User>, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_user_sqlite(pool, id).await
        } else if let Some(pool) = store.as_postgres() {
            get_user_postgres(pool, id).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Get a credential by its unique email
    pub async fn get_credential_by_email(email: &str) -> Result<Option<Credential>, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_credential_by_email_sqlite(pool, email).await
        } else if let Some(pool) = store.as_postgres() {
            get_credential_by_email_postgres(pool, email).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Get the student profile for a user, if one exists
    pub async fn get_student_profile(user_id: &str) -> Result<Option<StudentProfile>, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            get_student_profile_sqlite(pool, user_id).await
        } else if let Some(pool) = store.as_postgres() {
            get_student_profile_postgres(pool, user_id).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Create an unverified user together with its empty student profile,
    /// password-less credential and initial verification token, as one
    /// transaction. Partial creation is never observable.
    pub async fn create_pending_user(
        user: User,
        email: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<User, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            create_pending_user_sqlite(pool, user, email, token, expires_at).await
        } else if let Some(pool) = store.as_postgres() {
            create_pending_user_postgres(pool, user, email, token, expires_at).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Mark a user verified and set profile fields and the credential's
    /// password hash, as one transaction. A failure of any sub-write leaves
    /// the user fully unverified.
    pub async fn finalize_registration(
        user_id: &str,
        profile: &ProfileUpdate,
        password_hash: &str,
    ) -> Result<(), UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            finalize_registration_sqlite(pool, user_id, profile, password_hash).await
        } else if let Some(pool) = store.as_postgres() {
            finalize_registration_postgres(pool, user_id, profile, password_hash).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Provision a pre-verified user from a federation assertion: user row,
    /// default student profile and a password-less credential carrying the
    /// provider marker, as one transaction.
    pub async fn provision_federated_user(
        user: User,
        email: &str,
        provider: &str,
    ) -> Result<User, UserError> {
        let store = GENERIC_DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            provision_federated_user_sqlite(pool, user, email, provider).await
        } else if let Some(pool) = store.as_postgres() {
            provision_federated_user_postgres(pool, user, email, provider).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }
}
