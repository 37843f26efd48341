//! Model backend abstractions.
//!
//! - `ModelBackend`: RPITIT trait for concrete backend clients
//! - `BoxModelBackend`: object-safe wrapper for runtime candidate lists
//! - `BackendDispatcher`: ordered fallback across candidates

pub mod box_backend;
pub mod dispatcher;
pub mod provider;

pub use box_backend::BoxModelBackend;
pub use dispatcher::{BackendDispatcher, Candidate, DispatchResult};
pub use provider::ModelBackend;
