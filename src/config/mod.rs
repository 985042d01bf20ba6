//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → policy values built once and shared via Arc
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the allowlists never change at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, override_bind, ConfigError};
pub use schema::{
    ListenerConfig, ObservabilityConfig, RelayConfig, RelayPolicyConfig, StatusConfig,
    UpstreamConfig, UserAgentPolicy,
};
