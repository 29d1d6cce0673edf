/// Authenticated request context
///
/// Request guards decode the session cookie into an [`AuthContext`] and hand
/// it to handlers explicitly. Handlers never read identity from anywhere else.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::session::SessionClaims;
use crate::models::account::Role;

/// Identity of the logged-in user for the current request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub username: Option<String>,
    pub email: String,
    pub role: Role,
}

impl AuthContext {
    /// Creates auth context from validated session claims
    pub fn from_claims(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            email: claims.email,
            role: claims.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
