use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::domain::Role;

/// Request model for account registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Login email address
    #[oai(validator(min_length = 3, max_length = 254))]
    pub email: String,

    /// Display name shown to other users
    #[oai(validator(min_length = 1, max_length = 100))]
    pub display_name: String,

    /// Requested role; admin cannot be self-assigned
    pub role: Role,

    /// Password (minimum 6 characters)
    pub password: String,
}

/// Request model for the OAuth2 password-grant-compatible login form
///
/// The `username` field carries the account email; the field name follows the
/// OAuth2 password grant so standard clients can post the form unchanged.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginFormRequest {
    /// Account email, submitted under the OAuth2 `username` key
    pub username: String,

    /// Password for authentication
    pub password: String,
}

/// Request model for JSON-body login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginJsonRequest {
    /// Login email address
    pub email: String,

    /// Password for authentication
    pub password: String,
}

/// Response model containing the issued bearer token
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,
}

/// Request model for profile updates
///
/// Email and role are immutable; omitted fields are left unchanged.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name
    #[oai(validator(min_length = 1, max_length = 100))]
    pub display_name: Option<String>,

    /// New password (minimum 6 characters)
    pub password: Option<String>,
}
