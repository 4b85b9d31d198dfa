//! Symmetric access tokens.
//!
//! A token is the JSON-encoded [`Payload`] sealed with AES-256-GCM under the
//! server's secret key:
//!
//! ```text
//! v1.local.<base64url(nonce[12] || ciphertext || tag[16])>
//! ```
//!
//! The `v1.local.` header is bound as associated data, so a token cannot be
//! replayed under a different header. Tokens are stateless: there is no
//! revocation list and verification needs nothing but the key.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::cipher::{aes_gcm_decrypt, aes_gcm_encrypt, generate_nonce, NONCE_SIZE, TAG_SIZE};
use crate::error::TokenError;
use crate::format::{base64url_decode, base64url_encode};

/// Required length of the symmetric key in bytes.
pub const KEY_SIZE: usize = 32;

/// Version and purpose header prefixed to every token.
pub const TOKEN_HEADER: &str = "v1.local.";

/// Claims carried inside an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Random token identifier.
    pub id: Uuid,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}

impl Payload {
    /// Build a payload for `username` valid for `ttl` from `now`.
    pub fn new(username: &str, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            issued_at: now,
            expired_at: now + ttl,
        }
    }

    /// Check expiry against `now`; the token is expired at `expired_at` itself.
    pub fn valid_at(&self, now: DateTime<Utc>) -> Result<(), TokenError> {
        if now >= self.expired_at {
            return Err(TokenError::ExpiredToken);
        }
        Ok(())
    }
}

#[derive(Zeroize, ZeroizeOnDrop)]
struct SymmetricKey([u8; KEY_SIZE]);

/// Issues and verifies access tokens with one secret key.
pub struct TokenMaker {
    key: SymmetricKey,
}

impl std::fmt::Debug for TokenMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenMaker")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl TokenMaker {
    /// Create a maker from raw key bytes, which must be exactly [`KEY_SIZE`] long.
    pub fn new(key: &[u8]) -> Result<Self, TokenError> {
        let bytes: [u8; KEY_SIZE] = key
            .try_into()
            .map_err(|_| TokenError::InvalidKeySize(key.len()))?;
        Ok(Self {
            key: SymmetricKey(bytes),
        })
    }

    /// Issue a token for `username` that expires after `ttl`.
    ///
    /// A negative `ttl` yields a token that is already expired.
    pub fn issue(&self, username: &str, ttl: Duration) -> Result<(String, Payload), TokenError> {
        let payload = Payload::new(username, ttl, Utc::now());
        let token = self.seal(&payload)?;
        Ok((token, payload))
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Payload, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as of `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Payload, TokenError> {
        let payload = self.open(token)?;
        payload.valid_at(now)?;
        Ok(payload)
    }

    fn seal(&self, payload: &Payload) -> Result<String, TokenError> {
        let plaintext =
            serde_json::to_vec(payload).map_err(|e| TokenError::Encryption(e.to_string()))?;
        let nonce = generate_nonce();
        let ciphertext = aes_gcm_encrypt(&self.key.0, &nonce, &plaintext, TOKEN_HEADER.as_bytes())
            .map_err(|e| TokenError::Encryption(e.to_string()))?;

        let mut raw = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&ciphertext);

        Ok(format!("{}{}", TOKEN_HEADER, base64url_encode(&raw)))
    }

    fn open(&self, token: &str) -> Result<Payload, TokenError> {
        let body = token
            .strip_prefix(TOKEN_HEADER)
            .ok_or(TokenError::InvalidToken)?;
        let raw = base64url_decode(body).map_err(|_| TokenError::InvalidToken)?;
        if raw.len() < NONCE_SIZE + TAG_SIZE {
            return Err(TokenError::InvalidToken);
        }

        let (nonce, ciphertext) = raw.split_at(NONCE_SIZE);
        let nonce: [u8; NONCE_SIZE] = nonce.try_into().map_err(|_| TokenError::InvalidToken)?;
        let plaintext = aes_gcm_decrypt(&self.key.0, &nonce, ciphertext, TOKEN_HEADER.as_bytes())
            .map_err(|_| TokenError::InvalidToken)?;

        let payload: Payload =
            serde_json::from_slice(&plaintext).map_err(|_| TokenError::InvalidToken)?;
        if payload.id.is_nil() {
            return Err(TokenError::InvalidToken);
        }
        Ok(payload)
    }
}
