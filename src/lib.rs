pub mod analysis;
pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod http;
pub mod rate_limiter;
pub mod render;
pub mod services;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::database::DbPool;
use crate::services::{IngestionService, ProcessingService, PublishingService, ServerService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn open_pool(config: &AppConfig) -> Result<DbPool> {
    database::create_pool(&config.storage.database_path)
}

pub fn handle_scrape() -> Result<()> {
    let config = AppConfig::from_env();
    let pool = open_pool(&config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let mut service = IngestionService::new(&config, pool)?;
        service.run().await
    })
}

pub fn handle_analyze() -> Result<()> {
    let config = AppConfig::from_env();
    let service = ProcessingService::new(open_pool(&config)?);
    service.run()
}

pub fn handle_build() -> Result<()> {
    let config = AppConfig::from_env();
    let service = PublishingService::new(&config, open_pool(&config)?);
    service.run()
}

pub fn handle_run() -> Result<()> {
    handle_scrape()?;
    handle_analyze()?;
    handle_build()
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
