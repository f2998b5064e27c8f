//! HTTPS enforcement middleware for axum.
//!
//! Plaintext requests are redirected to their `https://` equivalent with a
//! `301`, or rejected with `403 HTTPS_REQUIRED`, depending on configuration.
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use https_always::{register, EnforcementOptions, RuntimeEnvironment};
//!
//! let routes: Router = Router::new().route("/", get(|| async { "hello" }));
//! let app = register(routes, &EnforcementOptions::default(), &RuntimeEnvironment::from_env());
//! # let _ = app;
//! ```

pub mod config;
pub mod enforcement;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::ServerConfig;
pub use enforcement::{
    register, Decision, EnforcementContext, EnforcementOptions, HttpsAlways, HttpsRequired,
    RuntimeEnvironment, PLUGIN_METADATA,
};
pub use error::Error;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
