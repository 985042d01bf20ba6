//! Relay pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → target.rs (pick `url`, default scheme, merge extra query)
//!     → engine.rs (allowlist check, outbound header filter)
//!     → upstream.rs (dispatch, stream response back)
//!     → error.rs (every failure rendered as the shared JSON shape)
//! ```
//!
//! # Design Decisions
//! - No buffering of upstream bodies; bytes flow as they arrive
//! - Upstream access sits behind a trait so tests can script responses
//! - Dropping the response body cancels the upstream call

pub mod engine;
pub mod error;
pub mod target;
pub mod upstream;

pub use engine::RelayEngine;
pub use error::{RelayError, RelayStage};
pub use target::{normalize_target, NormalizedTarget};
pub use upstream::{ReqwestUpstream, UpstreamClient, UpstreamRequest, UpstreamResponse};
