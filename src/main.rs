mod auth;
mod cli;
mod config;
mod error;
mod gitlab;
mod output;
mod report;
mod store;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting glbackup - GitLab Activity Backup");
    cli.execute().await?;

    Ok(())
}
