use std::path::PathBuf;

use futures::stream::{self, StreamExt};
use log::{error, info, warn};

use crate::error::Result;
use crate::output::PhaseProgress;
use crate::report::{BackupReport, CategoryReport};
use crate::store::Store;

use super::client::GitLabClient;
use super::fetch::{FetchOutcome, FetchStatus};
use super::types::{Commit, Note, Project, ResourceItem, ResourceKind};

pub const COMMITS_FILE: &str = "user_commits.json";
pub const MR_COMMENTS_FILE: &str = "user_mr_comments.json";
pub const ISSUE_COMMENTS_FILE: &str = "user_issue_comments.json";

/// Backs up one user's GitLab activity to local JSON files.
///
/// One run produces five categories: commits (gathered across the user's
/// projects), merge requests, issues, and the user's own comments on
/// those merge requests and issues. Commits and comments are persisted;
/// the raw project, merge request and issue listings only scope the
/// lookups that follow them.
pub struct ActivityBackup {
    client: GitLabClient,
    store: Store,
    user_id: u64,
    concurrency: usize,
}

impl ActivityBackup {
    pub fn new(client: GitLabClient, store: Store, user_id: u64, concurrency: usize) -> Self {
        Self {
            client,
            store,
            user_id,
            concurrency: concurrency.max(1),
        }
    }

    /// Runs the whole backup and returns the per-category report.
    ///
    /// Truncated fetches still contribute the records they managed to
    /// collect; the report marks such categories as incomplete. A failed
    /// file write is logged and recorded without aborting the remaining
    /// categories.
    ///
    /// # Errors
    ///
    /// Returns an error only for configuration-level problems such as an
    /// endpoint URL that cannot be constructed.
    pub async fn run(&self) -> Result<BackupReport> {
        info!("Starting activity backup for user {}", self.user_id);

        let mut report = BackupReport::new(self.user_id);
        let progress = PhaseProgress::start_phase_1();

        // The project listing only scopes the commit fan-out and is not
        // persisted itself.
        let projects = self.fetch_projects().await?;
        if projects.records.is_empty() {
            warn!("No projects found for user {}", self.user_id);
        }

        let commits = self.fetch_commits(&projects.records).await;
        let mut commits_report = CategoryReport::from_outcome(&commits);
        mark_source_truncated(&mut commits_report, &projects.status, "project");
        let saved = self.store.save(&commits.records, COMMITS_FILE).map(Some);
        record_save_result(&mut commits_report, COMMITS_FILE, saved);
        report.add("commits", commits_report);

        let progress = progress.finish_phase_1_start_phase_2();

        let merge_requests = self.fetch_authored(ResourceKind::MergeRequests).await?;
        let issues = self.fetch_authored(ResourceKind::Issues).await?;
        report.add(
            "merge requests",
            CategoryReport::from_outcome(&merge_requests),
        );
        report.add("issues", CategoryReport::from_outcome(&issues));

        let progress = progress.finish_phase_2_start_phase_3();

        let mr_comments = self
            .collect_comments(ResourceKind::MergeRequests, &merge_requests.records)
            .await;
        let issue_comments = self
            .collect_comments(ResourceKind::Issues, &issues.records)
            .await;

        report.add(
            "merge request comments",
            self.comment_category(&merge_requests, &mr_comments, MR_COMMENTS_FILE),
        );
        report.add(
            "issue comments",
            self.comment_category(&issues, &issue_comments, ISSUE_COMMENTS_FILE),
        );

        progress.finish_phase_3();

        Ok(report)
    }

    async fn fetch_projects(&self) -> Result<FetchOutcome<Project>> {
        let url = self
            .client
            .endpoint(&format!("users/{}/projects", self.user_id))?;
        Ok(self.client.fetch_paged(&url, "projects").await)
    }

    /// Gathers the user's commits across all their projects.
    ///
    /// Projects are looked up concurrently but the output keeps project
    /// order, with page order within each project.
    async fn fetch_commits(&self, projects: &[Project]) -> FetchOutcome<Commit> {
        let outcomes: Vec<FetchOutcome<Commit>> = stream::iter(projects)
            .map(|project| self.project_commits(project))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut all = FetchOutcome::empty();
        for outcome in outcomes {
            all.absorb(outcome);
        }
        all
    }

    async fn project_commits(&self, project: &Project) -> FetchOutcome<Commit> {
        let label = format!("project {} commits", project.id);
        let url = match self.client.endpoint(&format!(
            "projects/{}/repository/commits?author_id={}",
            project.id, self.user_id
        )) {
            Ok(url) => url,
            Err(e) => {
                warn!("Skipping {label}: {e}");
                return FetchOutcome::failed(e.to_string());
            }
        };

        self.client.fetch_paged(&url, &label).await
    }

    /// Fetches all merge requests or issues authored by the user, across
    /// every project and state.
    async fn fetch_authored(&self, kind: ResourceKind) -> Result<FetchOutcome<ResourceItem>> {
        let url = self.client.endpoint(&format!(
            "{}?scope=all&state=all&author_id={}",
            kind.path(),
            self.user_id
        ))?;
        Ok(self.client.fetch_paged(&url, kind.plural()).await)
    }

    /// Gathers the user's own comments on the given merge requests or
    /// issues.
    ///
    /// Items are looked up concurrently but the output keeps item order,
    /// with page order within an item. An item whose notes fetch was
    /// truncated still contributes the pages that arrived, and marks the
    /// aggregate as truncated.
    pub async fn collect_comments(
        &self,
        kind: ResourceKind,
        items: &[ResourceItem],
    ) -> FetchOutcome<Note> {
        let outcomes: Vec<FetchOutcome<Note>> = stream::iter(items)
            .map(|item| self.item_comments(kind, item))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut all = FetchOutcome::empty();
        for outcome in outcomes {
            all.absorb(outcome);
        }
        all
    }

    async fn item_comments(&self, kind: ResourceKind, item: &ResourceItem) -> FetchOutcome<Note> {
        let label = format!("{} {}/{} comments", kind.singular(), item.project_id, item.iid);
        let url = match self.client.endpoint(&format!(
            "projects/{}/{}/{}/notes",
            item.project_id,
            kind.path(),
            item.iid
        )) {
            Ok(url) => url,
            Err(e) => {
                warn!("Skipping {label}: {e}");
                return FetchOutcome::failed(e.to_string());
            }
        };

        let outcome = self.client.fetch_paged::<Note>(&url, &label).await;

        FetchOutcome {
            records: outcome
                .records
                .into_iter()
                .filter(|note| note.author.id == self.user_id)
                .collect(),
            pages: outcome.pages,
            status: outcome.status,
        }
    }

    /// Builds the report entry for a comment category and writes its file
    /// when there is anything to write.
    fn comment_category(
        &self,
        source: &FetchOutcome<ResourceItem>,
        comments: &FetchOutcome<Note>,
        filename: &str,
    ) -> CategoryReport {
        let mut category = CategoryReport::from_outcome(comments);
        mark_source_truncated(&mut category, &source.status, "source");
        let saved = self.store.save_if_any(&comments.records, filename);
        record_save_result(&mut category, filename, saved);
        category
    }
}

/// A truncated upstream listing means dependent categories may be missing
/// records even when their own fetches completed.
fn mark_source_truncated(category: &mut CategoryReport, source: &FetchStatus, what: &str) {
    if let FetchStatus::Truncated(cause) = source {
        category.complete = false;
        category
            .error
            .get_or_insert_with(|| format!("{what} listing truncated: {cause}"));
    }
}

fn record_save_result(
    category: &mut CategoryReport,
    filename: &str,
    result: Result<Option<PathBuf>>,
) {
    match result {
        Ok(Some(path)) => category.file = Some(path.display().to_string()),
        Ok(None) => {}
        Err(e) => {
            error!("Failed to save {filename}: {e}");
            category.complete = false;
            category.error.get_or_insert_with(|| e.to_string());
        }
    }
}
