//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layer stack)
//!     → request.rs (request ID, inbound request capture)
//!     → middleware/ (origin gate, before CORS and the handler)
//!     → [relay engine forwards upstream]
//!     → response.rs (panic recovery)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{InboundRequest, X_REQUEST_ID};
pub use server::HttpServer;
