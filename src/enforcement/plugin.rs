//! Plugin registration and the request hook.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};

use crate::enforcement::context::{try_resolve, EnforcementContext};
use crate::enforcement::guard::{evaluate, Decision};
use crate::enforcement::options::{EnforcementOptions, RuntimeEnvironment};
use crate::http::request::RequestDescriptor;

/// Compatibility declaration for the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginMetadata {
    pub name: &'static str,
    pub host: &'static str,
    pub host_version: &'static str,
}

pub const PLUGIN_METADATA: PluginMetadata = PluginMetadata {
    name: "https-always",
    host: "axum",
    host_version: ">=0.8",
};

/// State bound to the installed hook.
#[derive(Debug, Clone)]
struct GuardState {
    ctx: Arc<EnforcementContext>,
    trust_proxy: bool,
}

/// The plugin: options plus how the host resolves the request protocol.
#[derive(Debug, Clone, Default)]
pub struct HttpsAlways {
    options: EnforcementOptions,
    trust_proxy: bool,
}

impl HttpsAlways {
    pub fn new(options: EnforcementOptions) -> Self {
        Self {
            options,
            trust_proxy: false,
        }
    }

    /// Take protocol and host from `X-Forwarded-*` headers.
    pub fn trust_proxy(mut self, trust: bool) -> Self {
        self.trust_proxy = trust;
        self
    }

    /// Install the guard on `router` if the options resolve to an active
    /// context for `environment`; otherwise return `router` untouched.
    ///
    /// The guard wraps everything already added to the router, the
    /// fallback included, so call this after the routes are in place.
    pub fn register<S>(&self, router: Router<S>, environment: &RuntimeEnvironment) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        match try_resolve(&self.options, environment) {
            Ok(ctx) => {
                tracing::info!(
                    plugin = PLUGIN_METADATA.name,
                    environment = %environment,
                    redirect = ctx.redirect_enabled(),
                    port_suffix = ctx.port_suffix(),
                    trust_proxy = self.trust_proxy,
                    "HTTPS enforcement installed"
                );
                let state = GuardState {
                    ctx: Arc::new(ctx),
                    trust_proxy: self.trust_proxy,
                };
                router.layer(middleware::from_fn_with_state(state, https_guard))
            }
            Err(reason) => {
                tracing::info!(
                    plugin = PLUGIN_METADATA.name,
                    environment = %environment,
                    %reason,
                    "HTTPS enforcement not installed"
                );
                router
            }
        }
    }
}

/// Register with default host settings (proxy headers not trusted).
pub fn register<S>(
    router: Router<S>,
    options: &EnforcementOptions,
    environment: &RuntimeEnvironment,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    HttpsAlways::new(options.clone()).register(router, environment)
}

async fn https_guard(State(state): State<GuardState>, request: Request, next: Next) -> Response {
    let descriptor = RequestDescriptor::from_request(&request, state.trust_proxy);

    match evaluate(&state.ctx, &descriptor) {
        Decision::Allow => next.run(request).await,
        Decision::Redirect { location } => {
            tracing::debug!(
                protocol = %descriptor.protocol,
                hostname = %descriptor.hostname,
                url = %descriptor.url,
                location = %location,
                "Redirecting to HTTPS"
            );
            match HeaderValue::from_str(&location) {
                Ok(value) => (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, value)]).into_response(),
                Err(_) => {
                    tracing::warn!(hostname = %descriptor.hostname, "Redirect target is not a valid header value");
                    (StatusCode::BAD_REQUEST, "Invalid Host").into_response()
                }
            }
        }
        Decision::Reject(err) => {
            tracing::warn!(
                protocol = %descriptor.protocol,
                hostname = %descriptor.hostname,
                url = %descriptor.url,
                code = err.code(),
                "Rejected plaintext request"
            );
            err.into_response()
        }
    }
}
