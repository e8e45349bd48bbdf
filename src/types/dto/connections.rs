use poem_openapi::{Enum, Object};
use serde::{Deserialize, Serialize};

use crate::types::db::connection_request;

/// Request model for opening a connection to an idea's founder
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateConnectionRequest {
    /// Idea the investor wants an introduction to
    pub idea_id: String,

    /// Introduction message shown to the founder
    #[oai(validator(min_length = 1, max_length = 2000))]
    pub message: String,
}

/// Founder's decision on a pending connection request
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[oai(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConnectionAction {
    Accept,
    Decline,
}

/// Request model for resolving a connection request
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RespondConnectionRequest {
    pub action: ConnectionAction,
}

/// Response model representing one connection request
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ConnectionResponse {
    /// Connection request ID (UUID)
    pub id: String,

    /// Requesting investor's user ID
    pub investor_id: String,

    /// Idea the request refers to
    pub idea_id: String,

    /// Introduction message
    pub message: String,

    /// Lifecycle status (pending, accepted, declined)
    pub status: String,

    /// Creation time (Unix timestamp, seconds)
    pub created_at: i64,

    /// Last update time (Unix timestamp, seconds)
    pub updated_at: i64,
}

impl From<connection_request::Model> for ConnectionResponse {
    fn from(model: connection_request::Model) -> Self {
        ConnectionResponse {
            id: model.id,
            investor_id: model.investor_id,
            idea_id: model.idea_id,
            message: model.message,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
