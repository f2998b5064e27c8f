//! TLS configuration and certificate loading.

use std::io;
use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

/// Make aws-lc-rs the process-wide rustls provider. A provider installed
/// earlier (by this call or anyone else) is kept.
pub fn install_crypto_provider() {
    if rustls::crypto::aws_lc_rs::default_provider().install_default().is_err() {
        tracing::trace!("rustls crypto provider already installed");
    }
}

/// Load TLS configuration from PEM certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, io::Error> {
    require_file(cert_path, "Certificate")?;
    require_file(key_path, "Private key")?;

    install_crypto_provider();
    let config = RustlsConfig::from_pem_file(cert_path, key_path).await?;
    tracing::debug!(cert = ?cert_path, key = ?key_path, "TLS certificate loaded");
    Ok(config)
}

fn require_file(path: &Path, what: &str) -> io::Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{what} file not found: {:?}", path),
        ))
    }
}
