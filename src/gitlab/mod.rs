mod activity;
mod client;
mod fetch;
mod types;

pub use activity::{ActivityBackup, COMMITS_FILE, ISSUE_COMMENTS_FILE, MR_COMMENTS_FILE};
pub use client::GitLabClient;
pub use fetch::{FetchOutcome, FetchStatus, TruncationCause};
