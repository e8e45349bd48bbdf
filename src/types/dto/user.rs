use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::user;

/// Response model representing one account
///
/// Role and status are returned as their stored wire strings.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID (UUID)
    pub id: String,

    /// Login email, stored lowercase
    pub email: String,

    /// Display name shown to other users
    pub display_name: String,

    /// Account role (innovator, investor, hub, admin)
    pub role: String,

    /// Account lifecycle status (pending, approved, suspended)
    pub status: String,

    /// False once an admin has blocked the account
    pub is_active: bool,

    /// True once an admin has approved the account
    pub is_approved: bool,

    /// Creation time (Unix timestamp, seconds)
    pub created_at: i64,
}

impl From<user::Model> for UserProfile {
    fn from(model: user::Model) -> Self {
        UserProfile {
            id: model.id,
            email: model.email,
            display_name: model.display_name,
            role: model.role,
            status: model.status,
            is_active: model.is_active,
            is_approved: model.is_approved,
            created_at: model.created_at,
        }
    }
}
