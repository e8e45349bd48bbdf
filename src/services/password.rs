use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::errors::CryptoError;

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Errors that can occur during password policy validation
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {0} characters")]
    TooShort(usize),

    #[error("Password must be at most {0} characters")]
    TooLong(usize),
}

/// Validate the password policy. Runs before anything touches the store.
pub fn validate_password(password: &str) -> Result<(), PasswordPolicyError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort(MIN_PASSWORD_LENGTH));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooLong(MAX_PASSWORD_LENGTH));
    }
    Ok(())
}

fn argon2_with_pepper(pepper: &str) -> Result<Argon2<'_>, CryptoError> {
    Argon2::new_with_secret(
        pepper.as_bytes(),
        Algorithm::Argon2id,
        Version::V0x13,
        Params::default(),
    )
    .map_err(|e| CryptoError::new("argon2_init", e.to_string()))
}

/// Hash a password using Argon2id with the process-wide pepper.
///
/// Returns the PHC-formatted hash string that includes the salt and
/// parameters.
pub fn hash_password(password: &str, pepper: &str) -> Result<String, CryptoError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = argon2_with_pepper(pepper)?;

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CryptoError::new("hash_password", e.to_string()))
}

/// Verify a password against a stored hash using the same pepper.
///
/// Returns true if the password matches the hash.
pub fn verify_password(password: &str, hash: &str, pepper: &str) -> Result<bool, CryptoError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| CryptoError::new("parse_password_hash", e.to_string()))?;

    let argon2 = argon2_with_pepper(pepper)?;
    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEPPER: &str = "test-pepper-16-chars";

    #[test]
    fn policy_rejects_short_and_long_passwords() {
        assert_eq!(
            validate_password("abc"),
            Err(PasswordPolicyError::TooShort(MIN_PASSWORD_LENGTH))
        );
        let long = "x".repeat(MAX_PASSWORD_LENGTH + 1);
        assert_eq!(
            validate_password(&long),
            Err(PasswordPolicyError::TooLong(MAX_PASSWORD_LENGTH))
        );
        assert!(validate_password("secret").is_ok());
    }

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct-horse-battery-staple", PEPPER).unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct-horse-battery-staple", &hash, PEPPER).unwrap());
        assert!(!verify_password("wrong-password", &hash, PEPPER).unwrap());
    }

    #[test]
    fn wrong_pepper_fails_verification() {
        let hash = hash_password("some-password", PEPPER).unwrap();
        assert!(!verify_password("some-password", &hash, "a-different-pepper!!").unwrap());
    }

    #[test]
    fn same_password_gets_different_salts() {
        let hash1 = hash_password("same-password", PEPPER).unwrap();
        let hash2 = hash_password("same-password", PEPPER).unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn invalid_hash_format_is_an_error() {
        assert!(verify_password("password", "not-a-valid-hash", PEPPER).is_err());
    }
}
