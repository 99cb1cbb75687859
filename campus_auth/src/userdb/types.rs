use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use super::errors::UserError;

/// Account role, stored as its SCREAMING-CASE name in the role column and in
/// token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Student,
    Admin,
    Staff,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "STUDENT",
            UserRole::Admin => "ADMIN",
            UserRole::Staff => "STAFF",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STUDENT" => Ok(UserRole::Student),
            "ADMIN" => Ok(UserRole::Admin),
            "STAFF" => Ok(UserRole::Staff),
            other => Err(UserError::InvalidData(format!("Unknown role: {other}"))),
        }
    }
}

/// A core user identity. Profile fields stay empty until the registration
/// completion step; federated sign-in fills them from the verified assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub photo_url: Option<String>,
    pub verified: bool,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// A fresh, unverified user created at registration initiation.
    pub fn new_pending(id: String) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            phone_number: None,
            photo_url: None,
            verified: false,
            role: UserRole::Student,
            created_at: Utc::now(),
        }
    }

    /// A user provisioned from a verified federation assertion. Email
    /// ownership is already proven, so the account starts verified.
    pub fn new_federated(
        id: String,
        first_name: Option<String>,
        last_name: Option<String>,
        photo_url: Option<String>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            phone_number: None,
            photo_url,
            verified: true,
            role: UserRole::Student,
            created_at: Utc::now(),
        }
    }
}

/// Email/password credential, 1:1 with a user. The password hash stays NULL
/// until registration completion, and permanently for federated accounts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Credential {
    pub user_id: String,
    pub email: String,
    pub password_hash: Option<String>,
    /// Federation marker, e.g. "GOOGLE". NULL for password accounts.
    pub provider: Option<String>,
}

/// Role-specific profile data for students.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct StudentProfile {
    pub user_id: String,
    pub dormitory: Option<String>,
    pub building: Option<String>,
    pub room: Option<String>,
    pub status: String,
}

/// Profile fields supplied by the registration completion step.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub dormitory: String,
    pub building: String,
    pub room: String,
}
