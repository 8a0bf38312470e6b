//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Typed REST resource client
#[derive(Parser, Debug)]
#[command(name = "resource-client")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one page of a resource
    Index {
        /// Resource name from the config
        #[arg(short, long)]
        resource: String,

        /// Filter as key=value (repeatable). JSON values are parsed.
        #[arg(long = "filter", value_parser = parse_key_value)]
        filters: Vec<(String, String)>,

        /// Page size
        #[arg(long)]
        length: Option<u64>,

        /// Starting offset
        #[arg(long)]
        offset: Option<u64>,
    },

    /// Fetch one record
    Get {
        #[arg(short, long)]
        resource: String,

        #[arg(long)]
        id: String,

        /// Skip the response cache
        #[arg(long)]
        no_cache: bool,

        /// Cache freshness window in milliseconds
        #[arg(long)]
        ttl_ms: Option<u64>,
    },

    /// Fetch every page of a resource
    All {
        #[arg(short, long)]
        resource: String,

        #[arg(long = "filter", value_parser = parse_key_value)]
        filters: Vec<(String, String)>,

        /// Records per page
        #[arg(long)]
        page_size: Option<u64>,
    },

    /// Create a record from JSON
    Create {
        #[arg(short, long)]
        resource: String,

        /// Record as a JSON object
        #[arg(long)]
        json: String,
    },

    /// Replace a record with JSON
    Update {
        #[arg(short, long)]
        resource: String,

        #[arg(long)]
        id: String,

        #[arg(long)]
        json: String,
    },

    /// Delete a record
    Delete {
        #[arg(short, long)]
        resource: String,

        #[arg(long)]
        id: String,
    },

    /// List configured resource names
    Resources,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
