//! Bearer-token authentication.
//!
//! [`auth_middleware`] runs in front of every protected route. It walks the
//! `Authorization` header through a small state machine:
//!
//! ```text
//! no header                      -> 401
//! fewer than two fields          -> 401
//! scheme != bearer (any case)    -> 401
//! token fails verification       -> 401
//! otherwise                      -> payload stored in request extensions
//! ```
//!
//! Handlers read the verified identity through the [`AuthUser`] extractor.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use notestack_crypto::{Payload, TokenError};
use thiserror::Error;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Why a request was not authenticated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthRejection {
    #[error("authorization header is not provided")]
    MissingHeader,
    #[error("invalid authorization header format")]
    InvalidFormat,
    #[error("unsupported authorization type {0}")]
    UnsupportedScheme(String),
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Extract the bearer token from an `Authorization` header value.
pub fn parse_authorization(header: Option<&HeaderValue>) -> Result<&str, AuthRejection> {
    let header = header.ok_or(AuthRejection::MissingHeader)?;
    let header = header.to_str().map_err(|_| AuthRejection::InvalidFormat)?;

    let fields: Vec<&str> = header.split_whitespace().collect();
    if fields.len() < 2 {
        return Err(AuthRejection::InvalidFormat);
    }
    if !fields[0].eq_ignore_ascii_case("bearer") {
        return Err(AuthRejection::UnsupportedScheme(fields[0].to_string()));
    }
    Ok(fields[1])
}

/// Verify the bearer token and attach its [`Payload`] to the request.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let verified = parse_authorization(request.headers().get(AUTHORIZATION))
        .and_then(|token| state.tokens.verify(token).map_err(AuthRejection::from));

    match verified {
        Ok(payload) => {
            request.extensions_mut().insert(payload);
            next.run(request).await
        }
        Err(rejection) => {
            debug!(
                subsystem = "auth",
                component = "middleware",
                path = %request.uri().path(),
                reason = %rejection,
                "Rejected unauthenticated request"
            );
            ApiError::Unauthorized(rejection.to_string()).into_response()
        }
    }
}

/// The verified token payload of the current request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Payload);

impl AuthUser {
    pub fn username(&self) -> &str {
        &self.0.username
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Payload>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError::Unauthorized("authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).unwrap()
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(parse_authorization(None), Err(AuthRejection::MissingHeader));
    }

    #[test]
    fn test_single_field_is_invalid_format() {
        for value in ["Bearer", "v1.local.abc", "   "] {
            let h = header(value);
            assert_eq!(
                parse_authorization(Some(&h)),
                Err(AuthRejection::InvalidFormat),
                "{value:?}"
            );
        }
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        for scheme in ["Bearer", "bearer", "BEARER", "bEaReR"] {
            let h = header(&format!("{scheme} tok"));
            assert_eq!(parse_authorization(Some(&h)), Ok("tok"));
        }
    }

    #[test]
    fn test_other_scheme_rejected() {
        let h = header("Basic dXNlcjpwYXNz");
        assert_eq!(
            parse_authorization(Some(&h)),
            Err(AuthRejection::UnsupportedScheme("Basic".to_string()))
        );
    }

    #[test]
    fn test_extra_whitespace_tolerated() {
        let h = header("  Bearer    tok  ");
        assert_eq!(parse_authorization(Some(&h)), Ok("tok"));
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            AuthRejection::UnsupportedScheme("Basic".into()).to_string(),
            "unsupported authorization type Basic"
        );
        assert_eq!(
            AuthRejection::from(TokenError::ExpiredToken).to_string(),
            "token has expired"
        );
    }
}
