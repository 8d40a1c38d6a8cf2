//! pgagent - list tables, columns and column types of a PostgreSQL database.

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Args, Command};
use pgagent_core::logging::{init_logging, log_dir, LogConfig};
use pgagent_core::{ConnectOptions, DatabaseWorkspace, Function, KeychainSecret, WorkspaceError};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let mut log_config = LogConfig::new(log_dir());
    if let Some(filter) = &args.log {
        log_config = log_config.with_filter(filter);
    }
    let _logging_guard = init_logging(log_config);

    match run(&args).await {
        Ok(output) => {
            if let Some(output) = output {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err, args.verbose);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<Option<String>> {
    match &args.command {
        Command::Functions => {
            let listing = Function::all()
                .iter()
                .map(|f| format!("{:<14} {}", f.as_str(), f.description()))
                .collect::<Vec<_>>()
                .join("\n");
            return Ok(Some(listing));
        }
        Command::StoreSecret { account, from_env } => {
            let value = std::env::var(from_env)
                .with_context(|| format!("environment variable {from_env} is not set"))?;
            KeychainSecret::new(account).store(&value)?;
            tracing::info!(account = %account, "Secret stored");
            return Ok(None);
        }
        _ => {}
    }

    let call = args
        .command
        .to_call()
        .context("invalid call envelope")?
        .context("subcommand does not invoke a workspace function")?;

    let options = ConnectOptions::from_env()?;
    let workspace = DatabaseWorkspace::with_secret(args.secret.to_secret()).with_options(options);

    tracing::debug!(workspace = ?workspace, function = %call.function(), "Running");
    let output = workspace.call(&call).await?;
    Ok(Some(output))
}

/// Print an error to stderr, with hint and details when available.
fn report(err: &anyhow::Error, verbose: bool) {
    match err.downcast_ref::<WorkspaceError>() {
        Some(workspace_err) => {
            let info = workspace_err.to_error_info();
            eprintln!("{}: {}", info.error_type, info.message);
            if let Some(hint) = info.hint {
                eprintln!("Hint: {hint}");
            }
            if verbose {
                if let Some(detail) = info.technical_detail {
                    eprintln!("{detail}");
                }
            }
        }
        None => eprintln!("Error: {err:#}"),
    }
}
