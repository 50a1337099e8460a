//! Admin API.
//!
//! Mounted only when `admin.enabled`. Every route sits behind the bearer-key
//! middleware; there is no unauthenticated admin surface.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::auth::require_api_key;
use self::handlers::*;
use crate::http::server::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/links", post(create_link))
        .route("/admin/links/{id}", get(get_link))
        .route_layer(middleware::from_fn_with_state(state, require_api_key))
}
