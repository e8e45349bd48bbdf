use poem_openapi::{payload::Json, ApiResponse, Object};
use std::fmt;

use super::internal::{AccessDenied, AssistError, CryptoError, MatchError, StoreError, TokenError};

/// Standardized error response body for every endpoint
#[derive(Object, Debug)]
pub struct ErrorBody {
    /// Stable machine-readable error kind
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// API error responses, one variant per status the surface can return
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Request payload or parameters failed validation
    #[oai(status = 400)]
    BadRequest(Json<ErrorBody>),

    /// Credential missing, malformed, or rejected by every verifier
    #[oai(status = 401)]
    Unauthorized(Json<ErrorBody>),

    /// Authenticated but not allowed to perform the operation
    #[oai(status = 403)]
    Forbidden(Json<ErrorBody>),

    /// Resource does not exist or is not visible to the caller
    #[oai(status = 404)]
    NotFound(Json<ErrorBody>),

    /// Write conflicts with existing state
    #[oai(status = 409)]
    Conflict(Json<ErrorBody>),

    /// A collaborator (data store, hosted provider) failed
    #[oai(status = 502)]
    UpstreamUnavailable(Json<ErrorBody>),

    /// Server misconfiguration or unexpected failure
    #[oai(status = 500)]
    Internal(Json<ErrorBody>),
}

impl ApiError {
    fn body(error: &str, message: impl Into<String>, status_code: u16) -> Json<ErrorBody> {
        Json(ErrorBody {
            error: error.to_string(),
            message: message.into(),
            status_code,
        })
    }

    /// Create an invalid_argument error (400)
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ApiError::BadRequest(Self::body("invalid_argument", message, 400))
    }

    /// Create an invalid_token error (401)
    pub fn invalid_token() -> Self {
        ApiError::Unauthorized(Self::body(
            "invalid_token",
            "Bearer token was rejected by every supported dialect",
            401,
        ))
    }

    /// Create an invalid_credentials error (401)
    pub fn invalid_credentials() -> Self {
        ApiError::Unauthorized(Self::body(
            "invalid_credentials",
            "Invalid email or password",
            401,
        ))
    }

    /// Create a forbidden error (403)
    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(Self::body("forbidden", message, 403))
    }

    /// Create a not_found error (404)
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(Self::body("not_found", format!("{what} not found"), 404))
    }

    /// Create a conflict error (409)
    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(Self::body("conflict", message, 409))
    }

    /// Create an upstream_unavailable error (502)
    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        ApiError::UpstreamUnavailable(Self::body("upstream_unavailable", message, 502))
    }

    /// Create a configuration_error (500)
    pub fn configuration_error(message: impl Into<String>) -> Self {
        ApiError::Internal(Self::body("configuration_error", message, 500))
    }

    /// Create an internal_error (500)
    pub fn internal_error(message: impl Into<String>) -> Self {
        ApiError::Internal(Self::body("internal_error", message, 500))
    }

    fn inner(&self) -> &ErrorBody {
        match self {
            ApiError::BadRequest(json) => &json.0,
            ApiError::Unauthorized(json) => &json.0,
            ApiError::Forbidden(json) => &json.0,
            ApiError::NotFound(json) => &json.0,
            ApiError::Conflict(json) => &json.0,
            ApiError::UpstreamUnavailable(json) => &json.0,
            ApiError::Internal(json) => &json.0,
        }
    }

    /// Machine-readable kind of the error variant
    pub fn kind(&self) -> &str {
        &self.inner().error
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.inner().message.clone()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { what } => ApiError::conflict(format!("{what} already exists")),
            StoreError::NotFound { entity } => ApiError::not_found(entity),
            StoreError::Operation { .. } => {
                tracing::error!(error = %err, "store operation failed");
                ApiError::upstream_unavailable("Data store is unavailable")
            }
            StoreError::Corrupt { .. } => {
                tracing::error!(error = %err, "store returned malformed data");
                ApiError::internal_error("Stored record could not be decoded")
            }
            StoreError::Credential(inner) => ApiError::from(inner),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        tracing::debug!(error = %err, "token verification failed");
        ApiError::invalid_token()
    }
}

impl From<AccessDenied> for ApiError {
    fn from(err: AccessDenied) -> Self {
        ApiError::forbidden(err.reason)
    }
}

impl From<MatchError> for ApiError {
    fn from(err: MatchError) -> Self {
        ApiError::invalid_argument(err.to_string())
    }
}

impl From<AssistError> for ApiError {
    fn from(err: AssistError) -> Self {
        match err {
            AssistError::Unconfigured => {
                ApiError::configuration_error("No text-generation provider is configured")
            }
            other => {
                tracing::warn!(error = %other, "generation provider call failed");
                ApiError::upstream_unavailable("Text-generation provider is unavailable")
            }
        }
    }
}

impl From<CryptoError> for ApiError {
    fn from(err: CryptoError) -> Self {
        tracing::error!(error = %err, "crypto operation failed");
        ApiError::internal_error("Internal cryptography failure")
    }
}
