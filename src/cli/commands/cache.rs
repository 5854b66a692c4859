use colored::*;
use rust_i18n::t;
use std::io::{self, Write};

use crate::cache::{CacheConfig, CacheStore};
use crate::cli::args::{CacheArgs, CacheCommand};
use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::Result;

/// Execute cache management commands
pub async fn execute(args: CacheArgs, opts: &GlobalOpts) -> Result<()> {
    let config = Config::load()?;
    let cache_config = config.cache.to_cache_config()?;

    match args.command {
        CacheCommand::Status => show_status(&config, &cache_config).await,
        CacheCommand::Clear { force } => clear_cache(&cache_config, force || opts.quiet).await,
        CacheCommand::Path => {
            println!("{}", cache_config.db_path.display());
            Ok(())
        }
    }
}

/// Show cache status and statistics
async fn show_status(config: &Config, cache_config: &CacheConfig) -> Result<()> {
    let cache = CacheStore::new(cache_config.clone()).await?;
    let stats = cache.stats().await?;

    println!("{}", t!("cache.status_title").bold().cyan());
    println!("{}", "=".repeat(50));

    println!(
        "  {} {}",
        t!("cache.enabled").bold(),
        if config.cache.enabled {
            t!("common.yes").green()
        } else {
            t!("common.no").red()
        }
    );
    println!("  {} {}", t!("cache.entries").bold(), stats.total_entries);
    println!(
        "  {} {:.2} MB / {:.2} MB ({:.1}%)",
        t!("cache.usage").bold(),
        stats.total_size as f64 / 1_048_576.0,
        stats.max_size as f64 / 1_048_576.0,
        stats.utilization_percent()
    );
    println!("  {} {}", t!("cache.expired").bold(), stats.expired_entries);
    println!("  {} {} h", t!("cache.ttl").bold(), config.cache.ttl_hours);
    println!(
        "  {} {}",
        t!("cache.location").bold(),
        cache_config.db_path.display().to_string().italic()
    );

    Ok(())
}

/// Clear cache data
async fn clear_cache(cache_config: &CacheConfig, force: bool) -> Result<()> {
    if !force {
        print!("{} ", t!("cache.confirm_clear"));
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", t!("common.cancelled"));
            return Ok(());
        }
    }

    let cache = CacheStore::new(cache_config.clone()).await?;
    cache.clear().await?;
    println!("{}", t!("cache.cleared").green());

    Ok(())
}
