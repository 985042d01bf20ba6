//! CORS relay gateway library.
//!
//! A single-endpoint forwarding gateway: browser clients name a target URL,
//! the relay checks it against a host allowlist, forwards the call upstream
//! and streams the answer back with CORS headers attached.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod security;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
