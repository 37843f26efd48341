//! REST API layer: envelope format, error mapping, handlers, router.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
