use std::env;
use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Required setting '{name}' is missing")]
    Missing { name: &'static str },

    #[error("Setting '{name}' is invalid: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Deployment environment, from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Hosted-auth-provider verification settings (the external token dialect).
#[derive(Debug, Clone)]
pub struct ExternalAuthSettings {
    pub jwks_url: String,
    pub issuer: String,
    pub audience: Option<String>,
}

/// Credentials and endpoint for one text-generation provider.
#[derive(Clone)]
pub struct ProviderSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Application settings, loaded once at startup.
///
/// In production every setting without a safe default must be present or
/// startup fails; development falls back to local defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub bind_addr: String,
    pub database_url: String,
    pub token_lifetime_minutes: i64,
    pub allowed_origins: Vec<String>,
    pub external_auth: Option<ExternalAuthSettings>,
    pub gemini: Option<ProviderSettings>,
    pub openai: Option<ProviderSettings>,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let environment = Environment::from_env();

        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) if environment.is_production() => {
                return Err(SettingsError::Missing {
                    name: "DATABASE_URL",
                })
            }
            Err(_) => "sqlite://./venturelink.db?mode=rwc".to_string(),
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let token_lifetime_minutes = match env::var("TOKEN_LIFETIME_MINUTES") {
            Ok(raw) => raw.parse::<i64>().ok().filter(|m| *m > 0).ok_or_else(|| {
                SettingsError::Invalid {
                    name: "TOKEN_LIFETIME_MINUTES",
                    message: format!("expected a positive integer, got '{raw}'"),
                }
            })?,
            Err(_) => 60,
        };

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let external_auth = match env::var("EXTERNAL_JWKS_URL") {
            Ok(jwks_url) => {
                let issuer = env::var("EXTERNAL_ISSUER").map_err(|_| SettingsError::Invalid {
                    name: "EXTERNAL_ISSUER",
                    message: "required when EXTERNAL_JWKS_URL is set".to_string(),
                })?;
                Some(ExternalAuthSettings {
                    jwks_url,
                    issuer,
                    audience: env::var("EXTERNAL_AUDIENCE").ok(),
                })
            }
            Err(_) => None,
        };

        let gemini = env::var("GEMINI_API_KEY").ok().map(|api_key| ProviderSettings {
            api_key,
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string()),
        });

        let openai = env::var("OPENAI_API_KEY").ok().map(|api_key| ProviderSettings {
            api_key,
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
        });

        Ok(Settings {
            environment,
            bind_addr,
            database_url,
            token_lifetime_minutes,
            allowed_origins,
            external_auth,
            gemini,
            openai,
        })
    }
}
