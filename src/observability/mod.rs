//! Observability.
//!
//! Structured `tracing` events with the request ID attached by the HTTP
//! layer's trace span.

pub mod logging;
