mod database;
mod logging;
mod secrets;
mod settings;

pub use database::{init_database, run_migrations};
pub use logging::{init_logging, LoggingError};
pub use secrets::{SecretError, SecretManager};
pub use settings::{
    Environment, ExternalAuthSettings, ProviderSettings, Settings, SettingsError,
};
