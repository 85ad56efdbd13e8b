//! Command-line interface for SkyScan.

mod commands;

use clap::{Parser, Subcommand};

/// SkyScan - anonymous weather lookup with personal autocomplete
#[derive(Parser)]
#[command(name = "skyscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    #[command(alias = "web")]
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Show the most searched cities
    Stats {
        /// Number of cities to show
        #[arg(default_value = "10")]
        limit: usize,
    },

    /// Look up cities with the geocoder
    #[command(alias = "s")]
    Search {
        /// City name
        #[arg(required = true)]
        query: Vec<String>,
    },
}

pub use commands::*;
