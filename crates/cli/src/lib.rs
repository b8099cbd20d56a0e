pub mod commands;

use clap::{Parser, Subcommand};
use quotesearch_core::Dialect;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "quotesearch",
    about = "Quotesearch operator CLI",
    long_about = "Inspect configuration, validate the quote dataset, and replay webhook fulfillment locally.",
    after_help = "Examples:\n  quotesearch doctor --json\n  quotesearch config\n  quotesearch stats\n  quotesearch query --action get_quote_response --author \"Grace Hopper\""
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Validate config, dataset loading, and a sample fulfillment")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution"
    )]
    Config,
    #[command(about = "Load the dataset and report index sizes")]
    Stats,
    #[command(about = "Run one webhook request against the local dataset and print the response")]
    Query {
        #[arg(long, help = "Webhook action, e.g. get_quote_event")]
        action: String,
        #[arg(long, help = "Author slot value")]
        author: Option<String>,
        #[arg(long, help = "Topic slot value")]
        topic: Option<String>,
        #[arg(long, default_value = "v1", help = "Envelope dialect: v1 (result) or v2 (queryResult)")]
        dialect: Dialect,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Config => commands::config::run(),
        Command::Stats => commands::stats::run(),
        Command::Query { action, author, topic, dialect } => {
            commands::query::run(commands::query::QueryArgs { action, author, topic, dialect })
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
