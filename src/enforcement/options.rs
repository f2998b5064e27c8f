//! Caller-supplied enforcement options and the runtime-environment indicator.

use serde::{Deserialize, Serialize};

/// Literal the runtime environment must equal for production-only enforcement.
pub const PRODUCTION: &str = "production";

/// Process variable consulted when no environment is given explicitly.
pub const ENVIRONMENT_VAR: &str = "APP_ENV";

/// Options accepted at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EnforcementOptions {
    /// Master on/off switch.
    pub enabled: bool,

    /// Only enforce when the runtime environment is production.
    #[serde(alias = "productionOnly")]
    pub production_only: bool,

    /// Redirect plaintext requests (true) or reject them with 403 (false).
    pub redirect: bool,

    /// Explicit port appended to the redirect target.
    #[serde(alias = "httpsPort")]
    pub https_port: Option<u16>,
}

impl Default for EnforcementOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            production_only: true,
            redirect: true,
            https_port: None,
        }
    }
}

/// The runtime-environment indicator, read once before registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeEnvironment(String);

impl RuntimeEnvironment {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn production() -> Self {
        Self::new(PRODUCTION)
    }

    /// Read [`ENVIRONMENT_VAR`]; unset or non-unicode reads as empty.
    pub fn from_env() -> Self {
        Self(std::env::var(ENVIRONMENT_VAR).unwrap_or_default())
    }

    /// Exact, case-sensitive comparison with [`PRODUCTION`].
    pub fn is_production(&self) -> bool {
        self.0 == PRODUCTION
    }
}

impl std::fmt::Display for RuntimeEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
