//! Formwright CLI - fill PDF forms from unstructured sources.

use clap::Parser;
use formwright_cli::commands;
use formwright_cli::{Cli, Command, Config, Formatter};
use formwright_domain::RunState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Returns whether the command succeeded
async fn run() -> formwright_cli::Result<bool> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    let format = cli.format.map(Into::into).unwrap_or(config.defaults.format);
    let color_enabled = !cli.no_color && config.defaults.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Fill(args) => {
            let report = commands::execute_fill(args, &config, &formatter).await?;
            Ok(report.state == RunState::Done)
        }
        Command::Fields(args) => {
            commands::execute_fields(args, &config, &formatter).await?;
            Ok(true)
        }
        Command::Models(args) => {
            commands::execute_models(args, &config, &formatter).await?;
            Ok(true)
        }
    }
}
