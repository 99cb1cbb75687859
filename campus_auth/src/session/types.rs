use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Server-side record of an issued refresh token. The signed token string is
/// the lookup key; the row must exist for the token to be accepted, which is
/// what makes sign-out an effective revocation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}
