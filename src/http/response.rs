//! Response handling and transformation.
//!
//! # Responsibilities
//! - Render pipeline faults that escaped as panics
//! - Keep every failure in the shared JSON error shape
//!
//! # Design Decisions
//! - Relayed upstream responses are built by the relay engine and streamed
//!   through untouched
//! - A panic never takes the process down or leaves the caller hanging

use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::relay::error::RelayError;

/// Turn a caught panic into an `InternalError` response.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %detail, "Relay pipeline panicked");
    RelayError::Internal("unexpected failure in relay pipeline".to_string()).into_response()
}
