//! CLI interface for Authgate

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "authgate")]
#[command(author = "Krakaw")]
#[command(version)]
#[command(about = "Username/password login service with signed session tokens", long_about = None)]
pub struct Cli {
    /// Path to authgate.toml (searched upward from the current directory by default)
    #[arg(short, long, global = true, env = "AUTHGATE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a new authgate.toml with a freshly generated signing secret
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print a bcrypt hash for a password
    HashPassword {
        /// The plaintext password
        password: String,

        /// bcrypt cost factor
        #[arg(long, default_value_t = bcrypt::DEFAULT_COST)]
        cost: u32,
    },

    /// Validate a token against the configured secret and show its claims
    InspectToken {
        /// The raw token, without the header prefix
        token: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
