//! target-zendesk - Singer target that writes custom object records to Zendesk.

mod about;
mod app;

use std::path::PathBuf;

use clap::Parser;
use target_config_and_utils::{init_logging, TargetConfig};

/// target-zendesk command-line interface.
#[derive(Parser, Debug)]
#[command(name = "target-zendesk")]
#[command(about = "Singer target for Zendesk custom object records")]
#[command(version)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, env = "TARGET_ZENDESK_CONFIG", required_unless_present = "about")]
    config: Option<PathBuf>,

    /// Read Singer messages from a file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(short, long, env = "TARGET_ZENDESK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print a JSON description of this target and exit
    #[arg(long)]
    about: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.about {
        println!("{}", serde_json::to_string_pretty(&about::describe())?);
        return Ok(());
    }

    let Some(config_path) = cli.config else {
        return Err("--config is required".into());
    };
    let config = TargetConfig::load(&config_path)?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_logging(level)?;

    app::run(config, cli.input).await?;
    Ok(())
}
