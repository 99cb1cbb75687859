use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::userdb::UserRole;

/// Claims carried by access and refresh tokens: the stable identity triple
/// plus the standard issued-at/expiry pair added at signing time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    /// Stamp the stable identity triple with a fresh iat/exp window.
    pub fn new(id: String, email: String, role: UserRole, ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id,
            email,
            role,
            iat: now,
            exp: now + ttl_secs,
        }
    }

    /// Re-stamp existing claims for a new token, dropping the original
    /// iat/exp so they never leak into the next token.
    pub fn refreshed(&self, ttl_secs: i64) -> Self {
        Self::new(self.id.clone(), self.email.clone(), self.role, ttl_secs)
    }
}

/// Claims of the short-lived token that authorizes only the registration
/// completion step. Not a session token: it carries no email or role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionClaims {
    pub user_id: String,
    pub iat: i64,
    pub exp: i64,
}

impl CompletionClaims {
    pub fn new(user_id: String, ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            user_id,
            iat: now,
            exp: now + ttl_secs,
        }
    }
}
