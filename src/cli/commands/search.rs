use colored::*;
use rust_i18n::t;
use std::io;
use std::sync::Arc;

use super::session;
use crate::catalog::search::MIN_QUERY_LEN;
use crate::catalog::SearchIndex;
use crate::cli::args::SearchArgs;
use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::Result;
use crate::progress::ProgressManager;

/// Execute search command
pub async fn execute(args: SearchArgs, opts: &GlobalOpts) -> Result<()> {
    let config = Config::load()?;
    let progress = Arc::new(ProgressManager::new(opts.quiet));
    let mut view =
        session::build(&config, opts, config.catalog.page_sizes(), io::stdout()).await?;

    session::start(&mut view, &progress).await;

    let query = SearchIndex::normalize(&args.query);
    if !SearchIndex::is_active(&query) && !opts.quiet {
        eprintln!(
            "{}",
            t!("search.too_short", min = MIN_QUERY_LEN).yellow()
        );
    }
    view.search(&query);
    Ok(())
}
