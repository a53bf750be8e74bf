use anyhow::Result;
use bridge_pipeline::Translator;
use clap::Parser;
use tracing::info;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(cli.level_filter().into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = commands::load_config(cli.config.as_deref())?;
    info!(config = ?cli.config, "translator config ready");

    let output = match &cli.command {
        Commands::Parse { query, df, qf, mm } => commands::parse(
            &config,
            query,
            df.as_deref(),
            qf.as_deref(),
            mm.as_deref(),
        ),
        Commands::Request { input } => commands::request(&Translator::new(config), input)?,
        Commands::Response { input } => commands::response(&Translator::new(config), input)?,
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");

    Ok(())
}
