use std::fmt;

/// Secret loading failures, reported before the server starts
#[derive(Debug)]
pub enum SecretError {
    Missing {
        secret_name: String,
    },
    InvalidLength {
        secret_name: String,
        expected: usize,
        actual: usize,
    },
}

impl SecretError {
    pub fn missing(secret_name: &str) -> Self {
        Self::Missing {
            secret_name: secret_name.to_string(),
        }
    }

    pub fn invalid_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { secret_name } => {
                write!(f, "Required secret '{}' is missing", secret_name)
            }
            Self::InvalidLength {
                secret_name,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Secret '{}' must be at least {} characters, got {}",
                    secret_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

/// Centralized manager for application secrets
pub struct SecretManager {
    jwt_secret: String,
    pepper: String,
}

impl SecretManager {
    /// Load and validate all secrets from the environment.
    ///
    /// # Errors
    /// Returns `SecretError` if any required secret is missing or too short
    pub fn init() -> Result<Self, SecretError> {
        let jwt_secret = Self::load_required("JWT_SECRET", 32)?;
        let pepper = Self::load_required("PASSWORD_PEPPER", 16)?;

        Ok(Self { jwt_secret, pepper })
    }

    /// Signing secret for the local token dialect
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Process-wide pepper mixed into password hashing
    pub fn pepper(&self) -> &str {
        &self.pepper
    }

    fn load_required(name: &str, min_length: usize) -> Result<String, SecretError> {
        let value = std::env::var(name).map_err(|_| SecretError::missing(name))?;
        if value.len() < min_length {
            return Err(SecretError::invalid_length(name, min_length, value.len()));
        }
        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("pepper", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 2 }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-global; serialize these tests.
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    struct EnvGuard {
        vars: Vec<String>,
    }

    impl EnvGuard {
        fn new(vars: Vec<&str>) -> Self {
            for var in &vars {
                std::env::remove_var(var);
            }
            Self {
                vars: vars.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for var in &self.vars {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    fn init_succeeds_with_valid_secrets() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new(vec!["JWT_SECRET", "PASSWORD_PEPPER"]);

        std::env::set_var("JWT_SECRET", "this-is-a-valid-jwt-secret-with-32-characters");
        std::env::set_var("PASSWORD_PEPPER", "valid-pepper-16ch");

        let manager = SecretManager::init().unwrap();
        assert_eq!(
            manager.jwt_secret(),
            "this-is-a-valid-jwt-secret-with-32-characters"
        );
        assert_eq!(manager.pepper(), "valid-pepper-16ch");
    }

    #[test]
    fn missing_jwt_secret_is_reported_by_name() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new(vec!["JWT_SECRET", "PASSWORD_PEPPER"]);

        std::env::set_var("PASSWORD_PEPPER", "valid-pepper-16ch");

        match SecretManager::init().unwrap_err() {
            SecretError::Missing { secret_name } => assert_eq!(secret_name, "JWT_SECRET"),
            other => panic!("expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn short_pepper_is_rejected() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new(vec!["JWT_SECRET", "PASSWORD_PEPPER"]);

        std::env::set_var("JWT_SECRET", "this-is-a-valid-jwt-secret-with-32-characters");
        std::env::set_var("PASSWORD_PEPPER", "short");

        match SecretManager::init().unwrap_err() {
            SecretError::InvalidLength {
                secret_name,
                expected,
                actual,
            } => {
                assert_eq!(secret_name, "PASSWORD_PEPPER");
                assert_eq!(expected, 16);
                assert_eq!(actual, 5);
            }
            other => panic!("expected InvalidLength, got {other:?}"),
        }
    }

    #[test]
    fn debug_does_not_expose_secrets() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new(vec!["JWT_SECRET", "PASSWORD_PEPPER"]);

        std::env::set_var("JWT_SECRET", "this-is-a-valid-jwt-secret-with-32-characters");
        std::env::set_var("PASSWORD_PEPPER", "valid-pepper-16ch");

        let manager = SecretManager::init().unwrap();
        let debug_output = format!("{manager:?}");

        assert!(debug_output.contains("<redacted>"));
        assert!(!debug_output.contains("valid-pepper-16ch"));
    }
}
