mod commands;
mod config;
mod context;
mod error;
mod executor;
mod progress;
mod scheduler;
mod window;

use std::path::PathBuf;
use std::process::ExitCode;

use bridge_pacer_commons::{env::load_env, error::format_with_code, telemetry};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bridge-pacer")]
#[command(about = "Paced daily deposits to a bridge inbox")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the deposit pacing loop until interrupted
    Run {
        /// Path to the JSON configuration file
        #[arg(long, default_value = "config.json")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    load_env();

    let _telemetry = match telemetry::init_telemetry_from_env() {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("failed to initialize telemetry: {err}");
            return ExitCode::FAILURE;
        }
    };

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => match commands::run::run(&config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                tracing::error!("fatal: {}", format_with_code(&err));
                ExitCode::FAILURE
            }
        },
    }
}
