//! Per-request decision.
//!
//! # Decision table
//! ```text
//! protocol == "https"                  → Allow
//! protocol != "https", redirect on     → Redirect to https://host{port_suffix}{url}
//! protocol != "https", redirect off    → Reject (HTTPS_REQUIRED, 403)
//! ```

use crate::enforcement::context::EnforcementContext;
use crate::enforcement::error::HttpsRequired;
use crate::http::request::RequestDescriptor;

/// Outcome of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect { location: String },
    Reject(HttpsRequired),
}

/// Decide what happens to a request. Pure; never fails.
pub fn evaluate(ctx: &EnforcementContext, request: &RequestDescriptor) -> Decision {
    if request.protocol == "https" {
        return Decision::Allow;
    }

    if !ctx.redirect_enabled() {
        return Decision::Reject(HttpsRequired);
    }

    Decision::Redirect {
        location: redirect_target(ctx, request),
    }
}

/// `https://` + hostname without port + configured suffix + request url.
pub fn redirect_target(ctx: &EnforcementContext, request: &RequestDescriptor) -> String {
    format!(
        "https://{}{}{}",
        strip_port(&request.hostname),
        ctx.port_suffix(),
        request.url
    )
}

/// Drop a trailing `:<port>` from a hostname.
///
/// Truncates at the last `:` only when it is not the first character; a
/// colon-leading hostname is returned unchanged.
pub fn strip_port(hostname: &str) -> &str {
    match hostname.rfind(':') {
        Some(idx) if idx > 0 => &hostname[..idx],
        _ => hostname,
    }
}
