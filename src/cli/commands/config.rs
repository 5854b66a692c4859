use colored::*;
use rust_i18n::t;

use crate::cli::args::{ConfigArgs, ConfigCommand};
use crate::config::Config;
use crate::error::{DexError, Result};

/// Execute config command
pub async fn execute(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Set { key, value } => {
            let mut config = Config::load()?;
            config.set_and_save(&key, &value)?;
            let shown = config.get(&key).unwrap_or(value);
            println!("✅ {} {} = {}", t!("config.updated"), key, mask_value(&shown));
            Ok(())
        }
        ConfigCommand::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}: {}", key, mask_value(&value));
                    Ok(())
                }
                None => Err(DexError::Config(format!(
                    "Unknown configuration key: {} (known keys: {})",
                    key,
                    Config::KEYS.join(", ")
                ))),
            }
        }
        ConfigCommand::Path => {
            let path = Config::config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommand::Init => {
            Config::initialize()?;
            println!("✅ {}", t!("config.initialized"));
            println!("   {}", Config::config_file_path()?.display().to_string().dimmed());
            println!();
            println!("{}", t!("config.init_hint"));
            println!("  dex config set catalog.locale en");
            Ok(())
        }
    }
}

/// Shorten long values (URLs, paths) for display
fn mask_value(value: &str) -> String {
    let count = value.chars().count();
    if count > 60 {
        let head: String = value.chars().take(60).collect();
        format!("{}...({} characters)", head, count)
    } else {
        value.to_string()
    }
}
