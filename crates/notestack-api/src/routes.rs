//! Router assembly.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{from_fn_with_state, map_response};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::auth::auth_middleware;
use crate::error::ApiError;
use crate::handlers::{health, note_tags, notes, tags, users};
use crate::state::AppState;
use crate::telemetry::MakeRequestUuidV7;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the full application router.
///
/// `/health`, `/user` and `/login` are public; every other route sits behind
/// [`auth_middleware`]. Unknown paths, wrong methods and oversized bodies all
/// answer with the usual `{"error": msg}` body.
pub fn app(state: AppState, allowed_origins: &[String]) -> Router {
    let protected = Router::new()
        .route("/notes", post(notes::create_note).get(notes::list_notes))
        .route(
            "/notes/:id",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .route(
            "/notes/:id/tags/:tag_id",
            delete(note_tags::remove_tag_from_note),
        )
        .route("/tags", post(tags::create_tag).get(tags::list_tags))
        .route("/tags/:id", get(tags::get_tag).delete(tags::delete_tag))
        .route("/tags/:id/notes", get(note_tags::list_notes_for_tag))
        .route("/note_tags", post(note_tags::add_tag_to_note))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health))
        .route("/user", post(users::create_user))
        .route("/login", post(users::login_user))
        .merge(protected)
        .fallback(route_not_found)
        .layer(map_response(method_not_allowed_as_json))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("route not found".to_string())
}

// The router answers a wrong method with an empty 405; keep its Allow header.
async fn method_not_allowed_as_json(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }
    let allow = response.headers().get(header::ALLOW).cloned();
    let mut json = ApiError::MethodNotAllowed("method not allowed".to_string()).into_response();
    if let Some(allow) = allow {
        json.headers_mut().insert(header::ALLOW, allow);
    }
    json
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(subsystem = "api", origin = %origin, error = %e, "Invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600))
}
