//! Shared domain types for Colloquy.
//!
//! This crate contains the core domain types used across the Colloquy
//! orchestrator: exchanges, conversation entries, optimizer outcomes,
//! backend dispatch types, learning events, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod backend;
pub mod config;
pub mod error;
pub mod exchange;
pub mod learning;
pub mod optimizer;
