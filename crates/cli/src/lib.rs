pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "superclaw",
    about = "Superclaw operator CLI",
    long_about = "Operate superclaw migrations, demo fixtures, config inspection, and readiness checks.",
    after_help = "Examples:\n  superclaw doctor --json\n  superclaw config\n  superclaw usage-reset"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the idempotent demo dataset (one Starter user plus three agents)")]
    Seed,
    #[command(about = "Validate config, LLM client readiness, and DB connectivity checks")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Reset monthly message counters for billable tiers (Free is untouched)")]
    UsageReset,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::UsageReset => commands::usage_reset::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
