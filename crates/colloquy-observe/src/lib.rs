//! Observability setup for Colloquy.
//!
//! Owns tracing subscriber initialization and the optional
//! OpenTelemetry bridge so the binary crate stays free of subscriber
//! plumbing.

pub mod tracing_setup;
