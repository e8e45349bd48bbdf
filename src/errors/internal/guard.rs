use thiserror::Error;

/// Authorization denial, carrying the reason shown to the caller
#[derive(Error, Debug, PartialEq)]
#[error("access denied: {reason}")]
pub struct AccessDenied {
    pub reason: String,
}

impl AccessDenied {
    pub fn new(reason: impl Into<String>) -> Self {
        AccessDenied {
            reason: reason.into(),
        }
    }
}
