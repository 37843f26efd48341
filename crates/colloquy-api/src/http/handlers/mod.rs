//! REST API request handlers.

pub mod message;
