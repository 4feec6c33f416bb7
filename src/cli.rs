use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use crate::auth::Token;
use crate::config::Config;
use crate::gitlab::{ActivityBackup, GitLabClient};
use crate::output;
use crate::store::Store;

#[derive(Parser)]
#[command(name = "glbackup")]
#[command(author, version, about = "GitLab Activity Backup", long_about = None)]
pub struct Cli {
    /// GitLab personal access token
    #[arg(short, long, env = "GITLAB_API_TOKEN")]
    token: Option<String>,

    /// GitLab instance base URL
    #[arg(short, long, env = "GITLAB_API_BASE_URL")]
    url: Option<String>,

    /// Numeric id of the user whose activity is backed up
    #[arg(short = 'U', long, env = "GITLAB_USER_ID")]
    user_id: Option<u64>,

    /// Directory the JSON files are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Pretty-print the JSON files
    #[arg(short, long, default_value_t = false)]
    pretty: bool,

    /// Maximum number of pages to fetch per collection
    #[arg(long)]
    max_pages: Option<u64>,

    /// Number of per-item lookups to run concurrently
    #[arg(long)]
    concurrency: Option<usize>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Path to a configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write the run report as JSON to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        let token = self
            .token
            .as_deref()
            .or(config.gitlab.token.as_deref())
            .map(Token::from)
            .context("No GitLab token provided (use --token or GITLAB_API_TOKEN)")?;
        let user_id = self
            .user_id
            .or(config.gitlab.user_id)
            .context("No GitLab user id provided (use --user-id or GITLAB_USER_ID)")?;
        let base_url = self
            .url
            .clone()
            .unwrap_or_else(|| config.gitlab.base_url.clone());
        let output_dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| config.output.dir.clone());
        let pretty = self.pretty || config.output.pretty;
        let max_pages = self.max_pages.unwrap_or(config.fetch.max_pages);
        let concurrency = self.concurrency.unwrap_or(config.fetch.concurrency);
        let timeout = Duration::from_secs(self.timeout.unwrap_or(config.fetch.timeout_secs));

        info!("Backing up activity for user {user_id} from {base_url}");

        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory: {}", output_dir.display())
        })?;

        let client = GitLabClient::new(&base_url, &token, timeout, max_pages)?;
        let store = Store::new(output_dir, pretty);
        let backup = ActivityBackup::new(client, store, user_id, concurrency);

        let report = backup.run().await?;

        output::print_summary(&report);

        if let Some(report_path) = &self.report {
            let json = serde_json::to_string_pretty(&report)?;
            std::fs::write(report_path, json)?;
            info!("Report written to: {}", report_path.display());
        }

        Ok(())
    }
}
