mod commands;
mod config;
mod error;
mod format;
mod store;

use clap::Parser;

use certroll_common::error::ErrorCode;
use config::{Cli, Command, Config};

fn main() {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_new(Config::log_filter(&cli))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        let code = error::error_code(&e);
        if code == ErrorCode::PlanWaiting {
            tracing::info!("{e:#}");
        } else {
            tracing::error!(code = ?code, retryable = code.is_retryable(), "{e:#}");
        }
        std::process::exit(code.exit_code());
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::from_cli(cli);
    match &cli.command {
        Command::Check => commands::check(&config),
        Command::Plan { node, decode } => commands::plan(&config, node.as_deref(), *decode),
        Command::Script => commands::script(),
        Command::Rotate { assume_converged } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(commands::rotate(&config, *assume_converged))
        }
    }
}
