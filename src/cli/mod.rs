//! CLI interface for relorder.
//!
//! Provides command-line argument parsing using clap.

use clap::{Parser, Subcommand};

/// Default number of search results to return.
pub const DEFAULT_SEARCH_LIMIT: usize = 100;

/// Command-line interface for relorder.
#[derive(Parser)]
#[command(name = "relorder")]
#[command(author, version, about = "Relevance-ranked record search", long_about = None)]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search the configured datasets, printing records ordered by relevance.
    Search {
        /// The search query string.
        query: String,

        /// Maximum number of records to return.
        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },

    /// Show raw engine results: per-record relevance and aggregate statistics.
    Scores {
        /// The search query string.
        query: String,

        /// Maximum number of hits to return.
        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },

    /// List configured datasets and their index status.
    List,

    /// Build or rebuild the search index for all datasets.
    Index,
}
