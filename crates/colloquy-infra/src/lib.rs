//! Infrastructure layer for Colloquy.
//!
//! Contains the HTTP implementations of the collaborator traits
//! defined in `colloquy-core`: history, personalization, prompt
//! optimizer, model backends, and the learning sink. Also owns data
//! directory resolution and `config.toml` loading.

pub mod backend;
pub mod config;
pub mod history;
pub mod learning;
pub mod optimizer;
pub mod personalization;
