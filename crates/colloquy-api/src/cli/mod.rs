//! CLI command definitions and dispatch for the `clqy` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod send;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Conversational request orchestrator.
#[derive(Parser)]
#[command(name = "clqy", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Bridge tracing spans to an OpenTelemetry stdout exporter.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "7100")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Run one conversational turn against the configured collaborators.
    Send {
        /// User identifier the turn belongs to.
        #[arg(short, long)]
        user: String,

        /// The message to send.
        message: String,

        /// Application scope for the conversation thread.
        #[arg(long)]
        app_id: Option<String>,

        /// Free-text notes forwarded to the prompt optimizer.
        #[arg(long)]
        notes: Option<String>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
