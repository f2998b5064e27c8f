//! Top-level error type.

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS setup failed: {0}")]
    Tls(std::io::Error),

    #[error("TLS listener supplied without a [tls] section")]
    TlsNotConfigured,

    #[error("invalid bind address {0:?}")]
    BindAddress(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
