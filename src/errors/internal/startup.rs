use thiserror::Error;

use crate::config::{SecretError, SettingsError};
use crate::errors::AssistError;

/// Failure while assembling application state at boot.
///
/// Startup is fail-fast: any of these aborts the process before the
/// listener binds.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Secrets(#[from] SecretError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Assist(#[from] AssistError),

    #[error("failed to build the shared HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
