pub mod args;
pub mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use colored::*;
use rust_i18n::t;

/// Creature catalog viewer
#[derive(Parser, Debug)]
#[command(
    name = "dex",
    about = "Creature catalog viewer - browse, search and inspect a paginated creature catalog from the terminal",
    version,
    author,
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Language for names, categories and messages (e.g. de, en)
    #[arg(long, global = true, env = "DEXVIEW_LOCALE")]
    pub locale: Option<String>,

    /// Bypass the local collection cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Markdown format
    Markdown,
    /// CSV format
    Csv,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show every card in the collection, loading the first page if needed
    #[command(alias = "l")]
    List(args::ListArgs),

    /// Load the next page(s) of records
    #[command(alias = "m")]
    More(args::MoreArgs),

    /// Filter cards by name
    #[command(alias = "s")]
    Search(args::SearchArgs),

    /// Show the detail view of one record
    Show(args::ShowArgs),

    /// Interactive session
    #[command(alias = "b")]
    Browse,

    /// Manage the local collection cache
    Cache(args::CacheArgs),

    /// Manage configuration
    #[command(alias = "c")]
    Config(args::ConfigArgs),

    /// Show version information
    Version,

    /// Generate shell completion scripts
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Flags shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOpts {
    pub format: OutputFormat,
    pub quiet: bool,
    pub locale: Option<String>,
    pub no_cache: bool,
}

impl From<&Cli> for GlobalOpts {
    fn from(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            quiet: cli.quiet,
            locale: cli.locale.clone(),
            no_cache: cli.no_cache,
        }
    }
}

/// Message language for a locale tag such as `de-DE` or `en_US.UTF-8`
pub fn ui_language(tag: &str) -> &'static str {
    let language = tag
        .split(['-', '_', '.'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match language.as_str() {
        "de" => "de",
        _ => "en",
    }
}

impl Cli {
    /// Generate shell completion scripts
    fn generate_completions(shell: Shell) {
        use clap::CommandFactory;
        use clap_complete::generate;
        use std::io;

        let mut cmd = Self::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
    }

    /// Run the CLI application
    pub async fn run() -> crate::error::Result<()> {
        let cli = Self::parse();

        let filter = if cli.verbose { "debug" } else { "warn" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

        let ui_locale = cli
            .locale
            .clone()
            .or_else(sys_locale::get_locale)
            .map(|tag| ui_language(&tag))
            .unwrap_or("en");
        rust_i18n::set_locale(ui_locale);

        let opts = GlobalOpts::from(&cli);
        let result = match cli.command {
            Commands::List(args) => commands::list::execute(args, &opts).await,
            Commands::More(args) => commands::more::execute(args, &opts).await,
            Commands::Search(args) => commands::search::execute(args, &opts).await,
            Commands::Show(args) => commands::show::execute(args, &opts).await,
            Commands::Browse => commands::browse::execute(&opts).await,
            Commands::Cache(args) => commands::cache::execute(args, &opts).await,
            Commands::Config(args) => commands::config::execute(args).await,
            Commands::Version => {
                commands::version::execute();
                Ok(())
            }
            Commands::Completions { shell } => {
                Self::generate_completions(shell);
                Ok(())
            }
        };

        if let Err(e) = &result {
            eprintln!("{} {}", t!("error.prefix").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("\n{} {}", t!("error.hint").bold(), hint);
            } else if !cli.verbose {
                eprintln!("\n{}", t!("error.verbose"));
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ui_language() {
        assert_eq!(ui_language("de-DE"), "de");
        assert_eq!(ui_language("de_AT.UTF-8"), "de");
        assert_eq!(ui_language("DE"), "de");
        assert_eq!(ui_language("en-US"), "en");
        assert_eq!(ui_language("fr"), "en");
        assert_eq!(ui_language(""), "en");
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["dex", "more", "-n", "5", "--locale", "en", "-f", "json"])
            .unwrap();
        let opts = GlobalOpts::from(&cli);

        assert_eq!(opts.format, OutputFormat::Json);
        assert_eq!(opts.locale.as_deref(), Some("en"));
        match cli.command {
            Commands::More(args) => {
                assert_eq!(args.count, Some(5));
                assert_eq!(args.pages, 1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_show_rejects_next_and_prev_together() {
        let result = Cli::try_parse_from(["dex", "show", "1", "--next", "--prev"]);
        assert!(result.is_err());
    }
}
