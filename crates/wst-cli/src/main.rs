use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::process::ExitCode;
use tracing::debug;
use wst_lifecycle::{all_statuses, is_valid_transition, next_status};

/// Exit code for a transition the lifecycle refuses.
const EXIT_REJECTED: u8 = 2;

#[derive(Parser)]
#[command(name = "wst")]
#[command(about = "Wildlife storefront order tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the status sequence, first to last
    Statuses,

    /// Validate a status change (exit 2 when rejected)
    Check {
        /// Status the order is in now
        current: String,

        /// Status being requested
        next: String,
    },

    /// Print the status that follows CURRENT, or null
    Next {
        current: String,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> env -> overrides...)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Statuses => {
            println!("{}", serde_json::to_string(&all_statuses())?);
        }

        Commands::Check { current, next } => {
            let verdict = is_valid_transition(&current, &next);
            debug!(%current, %next, outcome = verdict.outcome(), "transition checked");
            let check = verdict.to_check();
            println!(
                "{}",
                json!({
                    "valid": check.valid,
                    "message": check.message,
                    "outcome": verdict.outcome(),
                })
            );
            if !check.valid {
                return Ok(ExitCode::from(EXIT_REJECTED));
            }
        }

        Commands::Next { current } => {
            println!("{}", serde_json::to_string(&next_status(&current))?);
        }

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = wst_config::load_layered_yaml(&path_refs)
                .with_context(|| format!("load config layers: {}", paths.join(", ")))?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
