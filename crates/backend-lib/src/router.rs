// ============================
// notes-backend-lib/src/router.rs
// ============================
//! HTTP routes and the layers around them.
use std::sync::Arc;
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use crate::handlers::{self, auth, notes};
use crate::middleware::{require_session, require_token, USER_ID_HEADER};
use crate::storage::Storage;
use crate::AppState;

/// Create the API router
pub fn create_router<S: Storage + Clone + 'static>(state: Arc<AppState<S>>) -> Router {
    let gate = Arc::clone(&state.gate);

    let notes = Router::new()
        .route("/notes", get(notes::list_notes::<S>).post(notes::create_note::<S>))
        .route(
            "/notes/{id}",
            put(notes::update_note::<S>).delete(notes::delete_note::<S>),
        )
        .route_layer(from_fn_with_state(Arc::clone(&gate), require_session));

    let logout = Router::new()
        .route("/auth/logout", post(auth::logout::<S>))
        .route_layer(from_fn_with_state(gate, require_token));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/register", post(auth::register::<S>))
        .route("/auth/login", post(auth::login::<S>))
        .merge(logout)
        .merge(notes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.settings.allowed_origin))
        .with_state(state)
}

fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let origin = if allowed_origin.trim() == "*" {
        AllowOrigin::from(Any)
    } else {
        match HeaderValue::from_str(allowed_origin.trim()) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!(allowed_origin, "invalid CORS origin, cross-origin requests disabled");
                AllowOrigin::list(Vec::<HeaderValue>::new())
            },
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER),
        ])
}
