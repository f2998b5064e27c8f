//! Network layer.
//!
//! TLS is terminated by the encrypted listener before requests reach the
//! router; the enforcement guard only sees the resulting transport marker.

pub mod tls;
