//! HTTP model backend clients and dispatcher assembly.
//!
//! - `DirectModelBackend`: unified model-serving endpoint
//! - `RoutedModelBackend`: legacy routed backend with its envelope format
//! - `build_dispatcher`: turns the configured candidate list into a
//!   ready [`BackendDispatcher`](colloquy_core::backend::BackendDispatcher)

pub mod builder;
pub mod direct;
pub mod routed;

pub use builder::build_dispatcher;
pub use direct::DirectModelBackend;
pub use routed::RoutedModelBackend;
