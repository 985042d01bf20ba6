pub mod handlers;

use axum::{routing::get, Router};

use crate::http::server::AppState;
use self::handlers::get_status;

/// Read-only status routes, merged into the main router.
pub fn status_router(path: &str) -> Router<AppState> {
    Router::new().route(path, get(get_status))
}
