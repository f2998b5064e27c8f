//! HTTPS enforcement.
//!
//! # Data Flow
//! ```text
//! Registration (once):
//!     EnforcementOptions + RuntimeEnvironment
//!     → context.rs (resolve → Option<EnforcementContext>)
//!     → plugin.rs (install hook only when Some)
//!
//! Every request:
//!     → http::request (build RequestDescriptor)
//!     → guard.rs (Allow / Redirect / Reject)
//!     → pass through, 301 + Location, or 403 HTTPS_REQUIRED
//! ```

pub mod context;
pub mod error;
pub mod guard;
pub mod options;
pub mod plugin;

pub use context::{resolve, EnforcementContext};
pub use error::HttpsRequired;
pub use guard::{evaluate, Decision};
pub use options::{EnforcementOptions, RuntimeEnvironment};
pub use plugin::{register, HttpsAlways, PluginMetadata, PLUGIN_METADATA};
