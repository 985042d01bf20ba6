//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<RelayConfig, ConfigError> {
    let config: RelayConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Replace the bind address of an already validated config and re-check it.
pub fn override_bind(mut config: RelayConfig, bind: String) -> Result<RelayConfig, ConfigError> {
    config.listener.bind_address = bind;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "127.0.0.1:8088"

            [relay]
            path = "/relay"
            allowed_hosts = ["ipinfo.io", "api.shodan.io"]
            allowed_origin = "http://localhost:5173"
            merge_extra_query = false

            [upstream]
            danger_accept_invalid_certs = false
            request_timeout_secs = 120
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:8088");
        assert_eq!(config.relay.path, "/relay");
        assert!(!config.relay.merge_extra_query);
        assert!(!config.upstream.danger_accept_invalid_certs);
        assert_eq!(config.upstream.request_timeout_secs, Some(120));
    }

    #[test]
    fn syntax_error_is_parse_error() {
        let err = parse_config("[relay\npath = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn semantic_error_is_validation_error() {
        let err = parse_config("[relay]\nallowed_hosts = []").unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::EmptyAllowList]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/cors-relay.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn bind_override_is_applied_and_checked() {
        let config = override_bind(RelayConfig::default(), "127.0.0.1:8080".into()).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8080");

        match override_bind(RelayConfig::default(), "not-an-address".into()) {
            Err(ConfigError::Validation(errors)) => {
                assert!(matches!(errors[..], [ValidationError::BindAddress(_)]));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
