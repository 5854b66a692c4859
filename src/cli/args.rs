use clap::{Args, Subcommand};

/// List command arguments
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Discard the cached collection and fetch it again
    #[arg(short, long)]
    pub refresh: bool,
}

/// Load-more command arguments
#[derive(Args, Debug)]
pub struct MoreArgs {
    /// Records per page (defaults to catalog.page_size)
    #[arg(short = 'n', long = "count", value_parser = clap::value_parser!(u32).range(1..))]
    pub count: Option<u32>,

    /// Number of pages to load
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,
}

/// Search command arguments
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Name fragment (at least 3 characters)
    pub query: String,
}

/// Detail view arguments
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Record id
    pub id: u32,

    /// Show the record after this one
    #[arg(long, conflicts_with = "prev")]
    pub next: bool,

    /// Show the record before this one
    #[arg(long)]
    pub prev: bool,

    /// Show the stats panel instead of the info panel
    #[arg(long)]
    pub stats: bool,
}

/// Configuration command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Cache management arguments
#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Show cache status and statistics
    Status,

    /// Clear all cached data
    Clear {
        /// Force clear without confirmation
        #[arg(short = 'y', long)]
        force: bool,
    },

    /// Show the cache database path
    Path,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., catalog.locale)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show configuration file path
    Path,

    /// Initialize configuration
    Init,
}
