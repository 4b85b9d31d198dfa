//! # notestack-api
//!
//! HTTP surface of notestack: bearer-token authentication, per-user notes and
//! tags, and the links between them.
//!
//! The binary builds an [`AppState`] from [`Config`] and serves [`app`]. Tests
//! drive the same router against an in-memory store.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ownership;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::{Config, StoreBackend};
pub use error::ApiError;
pub use routes::app;
pub use state::AppState;
