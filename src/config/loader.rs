//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_document() {
        let config = parse_config(
            r#"
            environment = "production"
            trust_proxy = true

            [listener]
            bind_address = "127.0.0.1:3080"

            [tls]
            bind_address = "127.0.0.1:3443"
            cert_path = "cert.pem"
            key_path = "key.pem"

            [enforcement]
            redirect = false
            https_port = 3443

            [timeouts]
            request_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.environment.as_deref(), Some("production"));
        assert!(config.trust_proxy);
        assert_eq!(config.listener.bind_address, "127.0.0.1:3080");
        assert_eq!(config.tls.unwrap().bind_address, "127.0.0.1:3443");
        assert!(config.enforcement.enabled);
        assert!(config.enforcement.production_only);
        assert!(!config.enforcement.redirect);
        assert_eq!(config.enforcement.https_port, Some(3443));
        assert_eq!(config.timeouts.request_secs, 5);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.environment.is_none());
        assert!(!config.trust_proxy);
        assert!(config.tls.is_none());
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn syntax_errors_surface_as_parse() {
        assert!(matches!(parse_config("listener = ["), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn semantic_errors_surface_as_validation() {
        let err = parse_config("[timeouts]\nrequest_secs = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
        assert_eq!(
            err.to_string(),
            "Validation failed: timeouts.request_secs must be greater than zero"
        );
    }

    #[test]
    fn missing_file_is_io() {
        let err = load_config(Path::new("/nonexistent/https-always.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
