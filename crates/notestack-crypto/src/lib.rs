//! # notestack-crypto
//!
//! Cryptographic primitives for notestack.
//!
//! ## Primitives
//!
//! - **Access tokens**: AES-256-GCM over a JSON payload, header bound as
//!   associated data, URL-safe base64 on the wire (see [`token`])
//! - **Password hashing**: Argon2id with random salts, PHC string output
//! - **Random generation**: `rand` thread RNG for nonces, `OsRng` for salts
//!
//! ## Examples
//!
//! ```rust
//! use chrono::Duration;
//! use notestack_crypto::{check_password, hash_password, TokenMaker};
//!
//! let maker = TokenMaker::new(&[7u8; 32]).unwrap();
//! let (token, payload) = maker.issue("alice", Duration::minutes(15)).unwrap();
//! assert_eq!(maker.verify(&token).unwrap().username, payload.username);
//!
//! let hashed = hash_password("hunter22").unwrap();
//! assert!(check_password("hunter22", &hashed).unwrap());
//! ```

pub mod cipher;
pub mod error;
pub mod format;
pub mod password;
pub mod token;

pub use error::{CryptoError, CryptoResult, TokenError};
pub use password::{check_password, hash_password};
pub use token::{Payload, TokenMaker, KEY_SIZE, TOKEN_HEADER};
