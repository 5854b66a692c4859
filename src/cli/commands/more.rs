use colored::*;
use rust_i18n::t;
use std::io;
use std::sync::Arc;

use super::session;
use crate::catalog::{LoadOutcome, Record, RenderGateway, RenderMode};
use crate::cli::args::MoreArgs;
use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::Result;
use crate::progress::{messages, LoadProgress, ProgressManager};

/// Execute load-more command
pub async fn execute(args: MoreArgs, opts: &GlobalOpts) -> Result<()> {
    let config = Config::load()?;
    let progress = Arc::new(ProgressManager::new(opts.quiet));

    let mut sizes = config.catalog.page_sizes();
    if let Some(count) = args.count {
        sizes.more = count;
    }
    let mut view = session::build(&config, opts, sizes, io::stdout()).await?;
    session::start(&mut view, &progress).await;

    // Collect every page first so json/csv output stays one document
    view.renderer_mut().mute_cards(true);
    let mut loaded: Vec<Record> = Vec::new();
    let mut exhausted = false;
    let mut failure = None;
    for _ in 0..args.pages {
        let outcome = {
            let spinner = LoadProgress::new(progress.clone(), &messages::loading(sizes.more));
            let outcome = view.load_more().await;
            spinner.finish_and_clear();
            outcome
        };

        match outcome {
            LoadOutcome::Loaded(records) if records.is_empty() => {
                exhausted = true;
                break;
            }
            LoadOutcome::Loaded(records) => loaded.extend(records),
            LoadOutcome::Failed(error) => {
                failure = Some(error);
                break;
            }
            // The coordinator is borrowed mutably, so its loads never overlap
            LoadOutcome::Busy => {}
        }
    }
    view.renderer_mut().mute_cards(false);

    let refs: Vec<&Record> = loaded.iter().collect();
    if !refs.is_empty() {
        view.renderer_mut().render_cards(&refs, RenderMode::Append)?;
    }

    if !opts.quiet {
        let total = view.len();
        eprintln!("{}", messages::loaded(refs.len(), total).green());
        if exhausted {
            eprintln!("{}", t!("more.exhausted").yellow());
        }
    }
    if let Some(error) = &failure {
        eprintln!("{}", t!("more.failed", error = error).red());
    }
    Ok(())
}
