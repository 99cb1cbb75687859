mod postgres;
mod sqlite;
mod store_type;

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::errors::UserError;
use super::types::{User, UserRole};

pub use store_type::UserStore;

/// Raw database row for users; the role column is TEXT and is parsed into
/// [`UserRole`] on the way out.
#[derive(Debug, FromRow)]
pub(super) struct UserRow {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub photo_url: Option<String>,
    pub verified: bool,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: UserRole = row.role.parse()?;
        Ok(User {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            phone_number: row.phone_number,
            photo_url: row.photo_url,
            verified: row.verified,
            role,
            created_at: row.created_at,
        })
    }
}
