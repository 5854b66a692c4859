use std::io;
use std::sync::Arc;

use super::session;
use crate::catalog::Direction;
use crate::cli::args::ShowArgs;
use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::Result;
use crate::progress::ProgressManager;

/// Execute show command
pub async fn execute(args: ShowArgs, opts: &GlobalOpts) -> Result<()> {
    let config = Config::load()?;
    let progress = Arc::new(ProgressManager::new(opts.quiet));
    let mut view =
        session::build(&config, opts, config.catalog.page_sizes(), io::stdout()).await?;

    session::start(&mut view, &progress).await;

    // Only the final view is printed
    view.renderer_mut().defer_detail(true);
    view.open_detail(args.id)?;
    if args.next {
        view.navigate(Direction::Next);
    } else if args.prev {
        view.navigate(Direction::Previous);
    }
    if args.stats {
        view.toggle_pane();
    }
    view.renderer_mut().flush_detail()
}
