//! Command-line interface

pub mod detect;
pub mod run;
pub mod search;
pub mod sites;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Adaptive browser automation engine
#[derive(Parser)]
#[command(
    name = "webpilot",
    version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"),
    about = "Drive a headless browser through resilient, site-aware action plans"
)]
pub struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter (e.g. `info`, `webpilot=debug`)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Execute an action plan file against a fresh browser session
    Run {
        /// YAML/JSON file with the ordered action list
        plan: PathBuf,

        /// Inject the anti-detection bootstrap
        #[arg(long)]
        stealth: bool,

        /// Show the browser window
        #[arg(long)]
        headed: bool,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Run a site-aware search and print the extracted records
    Search {
        /// Search query
        query: String,

        /// Site to search, given as a URL (decides the strategy)
        #[arg(long, default_value = "https://duckduckgo.com")]
        url: String,

        /// Maximum records to return
        #[arg(long)]
        limit: Option<usize>,

        /// Keep only results rated at least this value
        #[arg(long)]
        min_rating: Option<f64>,

        /// Keep only results priced at most this value
        #[arg(long)]
        max_price: Option<f64>,

        /// Inject the anti-detection bootstrap
        #[arg(long)]
        stealth: bool,
    },

    /// Classify a URL and show the selector table it would get
    Detect { url: String },

    /// List the known sites and their capabilities
    Sites,
}
