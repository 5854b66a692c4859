use log::info;
use std::io;
use std::sync::Arc;

use super::session;
use crate::cli::args::ListArgs;
use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::Result;
use crate::progress::ProgressManager;

/// Execute list command
pub async fn execute(args: ListArgs, opts: &GlobalOpts) -> Result<()> {
    let config = Config::load()?;
    let progress = Arc::new(ProgressManager::new(opts.quiet));
    let mut view =
        session::build(&config, opts, config.catalog.page_sizes(), io::stdout()).await?;

    if args.refresh {
        info!("Discarding the cached collection");
        view.forget_persisted().await;
    }

    session::start(&mut view, &progress).await;
    view.show_all();
    Ok(())
}
