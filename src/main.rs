use anyhow::Result;
use colored::Colorize;

use axe_charts::cli::Command;
use axe_charts::{
    handle_analyze, handle_build, handle_completions, handle_run, handle_scrape, handle_serve,
    interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("{} {e:?}", "Error:".red().bold());
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Scrape => handle_scrape(),
        Command::Analyze => handle_analyze(),
        Command::Build => handle_build(),
        Command::Run => handle_run(),
        Command::Serve { port } => handle_serve(*port),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
