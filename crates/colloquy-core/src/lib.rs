//! Orchestration logic and collaborator trait definitions for Colloquy.
//!
//! This crate defines the "ports" (collaborator traits) that the
//! infrastructure layer implements: history, personalization, prompt
//! optimization, model backends, and the learning sink. It depends
//! only on `colloquy-types` -- never on `colloquy-infra` or any HTTP
//! crate.

pub mod backend;
pub mod clarification;
pub mod history;
pub mod learning;
pub mod optimizer;
pub mod orchestrator;
pub mod personalization;
