//! AdScout CLI - Command-line interface for the AdScout lead pipeline.

use adscout_cli::commands;
use adscout_cli::{Cli, Command, Config, Formatter};
use adscout_store::SqliteLeadStore;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing (log to stderr so stdout stays machine-readable)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> adscout_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load config, writing the defaults on first use of the default location
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => {
            let path = Config::default_path()?;
            if path.exists() {
                Config::load_from(&path)?
            } else {
                let cfg = Config::default();
                cfg.save_to(&path).ok();
                cfg
            }
        }
    };
    config.apply_overrides(cli.db, cli.llm_endpoint, cli.llm_model);
    config.validate()?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    // Handle commands
    match cli.command {
        Command::Extract(args) => {
            commands::execute_extract(args, &config, &formatter).await?;
        }
        Command::Summary(args) => {
            commands::execute_summary(args, &config, &formatter)?;
        }
        cmd => {
            // Commands that need the lead database
            let mut store = SqliteLeadStore::new(&config.storage.database)?;

            match cmd {
                Command::Enrich(args) => {
                    commands::execute_enrich(args, &config, &mut store, &formatter).await?;
                }
                Command::Top(args) => {
                    commands::execute_top(args, &store, &formatter)?;
                }
                Command::Status(args) => {
                    commands::execute_status(args, &mut store, &formatter)?;
                }
                Command::Search(args) => {
                    commands::execute_search(args, &store, &formatter)?;
                }
                Command::Stats => {
                    commands::execute_stats(&store, &formatter)?;
                }
                Command::Extract(_) | Command::Summary(_) => unreachable!(),
            }
        }
    }

    Ok(())
}
