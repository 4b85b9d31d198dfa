//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`)
//! so the parameters travel with the hash and can be raised later without
//! invalidating existing accounts.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{CryptoError, CryptoResult};

/// Hash a password with a fresh random salt. Returns a PHC-format string.
pub fn hash_password(password: &str) -> CryptoResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CryptoError::PasswordHash(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash.
///
/// `Ok(false)` on mismatch; `Err` only when the stored hash is malformed.
pub fn check_password(password: &str, hashed: &str) -> CryptoResult<bool> {
    let parsed = PasswordHash::new(hashed)
        .map_err(|e| CryptoError::PasswordHash(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_differs_from_plaintext() {
        let hashed = hash_password("correct horse").unwrap();
        assert_ne!(hashed, "correct horse");
        assert!(hashed.starts_with("$argon2id$"));
    }

    #[test]
    fn test_check_password() {
        let hashed = hash_password("correct horse").unwrap();
        assert!(check_password("correct horse", &hashed).unwrap());
        assert!(!check_password("correct horsE", &hashed).unwrap());
        assert!(!check_password("", &hashed).unwrap());
    }

    #[test]
    fn test_salts_are_random() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
        assert!(check_password("same password", &a).unwrap());
        assert!(check_password("same password", &b).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        let result = check_password("anything", "not-a-phc-string");
        assert!(matches!(result, Err(CryptoError::PasswordHash(_))));
    }
}
