//! Shared encoding utilities.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{CryptoError, CryptoResult};

/// Encode bytes as unpadded URL-safe base64.
pub fn base64url_encode(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode unpadded URL-safe base64.
pub fn base64url_decode(data: &str) -> CryptoResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(data)
        .map_err(|e| CryptoError::InvalidFormat(format!("Invalid base64: {}", e)))
}
