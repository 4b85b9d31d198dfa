//! Error types for cryptographic operations.

use thiserror::Error;

/// Low-level cryptographic operation errors.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Encryption failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed - wrong key, wrong associated data, or corrupted data.
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Input is not in the expected encoding.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Password hashing or hash parsing failed.
    #[error("Password hash error: {0}")]
    PasswordHash(String),
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Access token errors.
///
/// Verification collapses every failure other than expiry into
/// [`TokenError::InvalidToken`] so callers cannot distinguish a forged token
/// from a garbled one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Token is malformed, fails authentication, or carries an unusable payload.
    #[error("token is invalid")]
    InvalidToken,

    /// Token authenticated correctly but its expiry has passed.
    #[error("token has expired")]
    ExpiredToken,

    /// Symmetric key has the wrong length.
    #[error("invalid key size: must be exactly {expected} bytes, got {0}", expected = crate::token::KEY_SIZE)]
    InvalidKeySize(usize),

    /// Token could not be produced.
    #[error("token encryption failed: {0}")]
    Encryption(String),
}
