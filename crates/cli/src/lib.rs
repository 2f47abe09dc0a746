pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "norrisbot",
    about = "NorrisBot operator CLI",
    long_about = "Prepare the joke store and inspect the configuration the bot will start with.",
    after_help = "Examples:\n  norrisbot migrate\n  norrisbot seed\n  norrisbot config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Create the info and jokes tables if they do not exist yet")]
    Migrate,
    #[command(about = "Load the built-in joke list into an empty jokes table")]
    Seed,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
