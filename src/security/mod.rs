//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → origin.rs (who may call the relay)
//!     → cors.rs (preflight + access-control response headers)
//!     → allowlist.rs (which upstream hosts may be reached)
//!     → headers.rs (which headers cross the relay)
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any gate failure
//! - Origin and allowlist gates are independent; both must pass
//! - Policies are immutable values built once at startup

pub mod allowlist;
pub mod cors;
pub mod headers;
pub mod origin;

pub use allowlist::AllowList;
pub use headers::{HeaderPolicy, HeaderPolicyError};
pub use origin::{OriginDecision, OriginPolicy};
