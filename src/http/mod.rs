//! HTTP host integration.
//!
//! # Data Flow
//! ```text
//! TCP / TLS listener
//!     → server.rs (request ID, trace span, timeout, Transport marker)
//!     → request.rs (RequestDescriptor for the guard)
//!     → enforcement guard
//!     → application routes
//! ```

pub mod request;
pub mod server;

pub use request::{MakeRequestUuid, RequestDescriptor, Transport, X_REQUEST_ID};
pub use server::HttpServer;
