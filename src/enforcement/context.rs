//! Configuration resolution.
//!
//! Runs once per registration. The result is immutable and shared by every
//! request the guard sees afterwards, so a later change of the runtime
//! environment has no effect on an installed guard.

use crate::enforcement::options::{EnforcementOptions, RuntimeEnvironment};

/// Resolved configuration consulted by the guard at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnforcementContext {
    redirect_enabled: bool,
    port_suffix: String,
}

impl EnforcementContext {
    pub fn new(redirect_enabled: bool, https_port: Option<u16>) -> Self {
        // A zero port is treated as absent.
        let port_suffix = match https_port {
            Some(port) if port != 0 => format!(":{port}"),
            _ => String::new(),
        };
        Self {
            redirect_enabled,
            port_suffix,
        }
    }

    pub fn redirect_enabled(&self) -> bool {
        self.redirect_enabled
    }

    /// Empty, or `:` followed by the configured port.
    pub fn port_suffix(&self) -> &str {
        &self.port_suffix
    }
}

/// Why [`resolve`] declined to produce a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inactive {
    Disabled,
    NotProduction,
}

impl std::fmt::Display for Inactive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Inactive::Disabled => f.write_str("enforcement disabled"),
            Inactive::NotProduction => f.write_str("production-only and environment is not production"),
        }
    }
}

/// Resolve options against the runtime environment.
///
/// `None` means no guard should be installed for this registration.
pub fn resolve(
    options: &EnforcementOptions,
    environment: &RuntimeEnvironment,
) -> Option<EnforcementContext> {
    try_resolve(options, environment).ok()
}

/// Like [`resolve`], reporting the reason when enforcement stays inactive.
pub fn try_resolve(
    options: &EnforcementOptions,
    environment: &RuntimeEnvironment,
) -> Result<EnforcementContext, Inactive> {
    if !options.enabled {
        return Err(Inactive::Disabled);
    }
    if options.production_only && !environment.is_production() {
        return Err(Inactive::NotProduction);
    }
    Ok(EnforcementContext::new(options.redirect, options.https_port))
}
