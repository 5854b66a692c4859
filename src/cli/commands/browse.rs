use colored::*;
use rust_i18n::t;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::session::{self, TerminalView};
use crate::catalog::{Direction, LoadOutcome};
use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::Result;
use crate::progress::{messages, LoadProgress, ProgressManager};

/// One line of input in the interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseAction {
    Search(String),
    ShowAll,
    More,
    Open(u32),
    Next,
    Previous,
    TogglePane,
    Close,
    Help,
    Quit,
}

/// Interpret one input line. Anything that is not a command is a search.
pub fn parse_action(line: &str) -> BrowseAction {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match (word.to_lowercase().as_str(), rest) {
        ("", _) => BrowseAction::ShowAll,
        ("q" | "quit" | "exit", "") => BrowseAction::Quit,
        ("h" | "help" | "?", "") => BrowseAction::Help,
        ("m" | "more", "") => BrowseAction::More,
        ("n" | "next", "") => BrowseAction::Next,
        ("p" | "prev", "") => BrowseAction::Previous,
        ("s" | "stats", "") => BrowseAction::TogglePane,
        ("c" | "close", "") => BrowseAction::Close,
        ("o" | "open", id) => match id.trim_start_matches('#').parse() {
            Ok(id) => BrowseAction::Open(id),
            Err(_) => BrowseAction::Search(line.to_string()),
        },
        (_, "") if word.starts_with('#') => match word[1..].parse() {
            Ok(id) => BrowseAction::Open(id),
            Err(_) => BrowseAction::Search(line.to_string()),
        },
        _ => BrowseAction::Search(line.to_string()),
    }
}

/// Execute interactive browse session
pub async fn execute(opts: &GlobalOpts) -> Result<()> {
    let config = Config::load()?;
    let progress = Arc::new(ProgressManager::new(opts.quiet));
    let sizes = config.catalog.page_sizes();
    let mut view = session::build(&config, opts, sizes, io::stdout()).await?;

    session::start(&mut view, &progress).await;
    view.show_all();
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", prompt(&mut view));
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_action(&line) {
            BrowseAction::Quit => break,
            BrowseAction::Help => print_help(),
            BrowseAction::ShowAll => {
                view.show_all();
            }
            BrowseAction::Search(query) => {
                if view.search(&query) == 0 {
                    println!("{}", t!("browse.no_match", query = query).yellow());
                }
            }
            BrowseAction::More => load_more(&mut view, &progress, sizes.more).await,
            BrowseAction::Open(id) => {
                if let Err(e) = view.open_detail(id) {
                    println!("{}", e.to_string().red());
                    if let Some(hint) = e.hint() {
                        println!("{}", hint.dimmed());
                    }
                }
            }
            BrowseAction::Next => navigate(&mut view, Direction::Next),
            BrowseAction::Previous => navigate(&mut view, Direction::Previous),
            BrowseAction::TogglePane => {
                if view.is_detail_open() {
                    view.toggle_pane();
                } else {
                    println!("{}", t!("browse.no_detail").yellow());
                }
            }
            BrowseAction::Close => view.close_detail(),
        }
    }

    Ok(())
}

async fn load_more<W: Write>(
    view: &mut TerminalView<W>,
    progress: &Arc<ProgressManager>,
    page_size: u32,
) {
    let outcome = {
        let _spinner = LoadProgress::new(progress.clone(), &messages::loading(page_size));
        view.load_more().await
    };
    match outcome {
        LoadOutcome::Failed(error) => println!("{}", t!("more.failed", error = error).red()),
        // The coordinator is borrowed mutably, so its loads never overlap
        LoadOutcome::Busy => {}
        LoadOutcome::Loaded(records) if records.is_empty() => {
            println!("{}", t!("more.exhausted").yellow())
        }
        LoadOutcome::Loaded(records) => {
            let total = view.len();
            println!("{}", messages::loaded(records.len(), total).green());
        }
    }
}

fn navigate<W: Write>(view: &mut TerminalView<W>, direction: Direction) {
    if view.navigate(direction).is_none() {
        println!("{}", t!("browse.no_detail").yellow());
    }
}

fn prompt<W: Write>(view: &mut TerminalView<W>) -> String {
    let prompt = match view.current() {
        Some(record) => format!("dex #{}>", record.id),
        None => "dex>".to_string(),
    };
    prompt.bold().to_string()
}

fn print_help() {
    println!("{}", t!("browse.help").dimmed());
}
