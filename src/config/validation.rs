//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate bind addresses and that listeners do not collide
//! - Validate value ranges (timeouts > 0, known log level)
//!
//! Returns every error found, not just the first. Enforcement options are
//! passed through as given; `https_port` in particular is not checked.

use std::net::SocketAddr;

use crate::config::schema::ServerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("tls.bind_address must differ from listener.bind_address ({0})")]
    AddressConflict(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("observability.log_level: unknown level {0:?}")]
    UnknownLogLevel(String),
}

/// Check a deserialized config for semantic problems.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let plain = parse_addr("listener.bind_address", &config.listener.bind_address, &mut errors);

    if let Some(tls) = &config.tls {
        let encrypted = parse_addr("tls.bind_address", &tls.bind_address, &mut errors);
        if let (Some(a), Some(b)) = (plain, encrypted) {
            if a == b {
                errors.push(ValidationError::AddressConflict(a.to_string()));
            }
        }
        if tls.cert_path.trim().is_empty() {
            errors.push(ValidationError::Empty("tls.cert_path"));
        }
        if tls.key_path.trim().is_empty() {
            errors.push(ValidationError::Empty("tls.key_path"));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn parse_addr(
    field: &'static str,
    value: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<SocketAddr> {
    match value.parse() {
        Ok(addr) => Some(addr),
        Err(_) => {
            errors.push(ValidationError::InvalidAddress {
                field,
                value: value.to_string(),
            });
            None
        }
    }
}
