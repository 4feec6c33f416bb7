use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::gitlab::{FetchOutcome, FetchStatus};

/// Summary of one backup run.
///
/// Categories are kept in the order they were backed up so the rendered
/// summary and the JSON report list them the same way.
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupReport {
    pub user_id: u64,
    pub collected_at: DateTime<Utc>,
    pub categories: IndexMap<String, CategoryReport>,
}

/// Outcome of one backed-up category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    /// Number of records collected
    pub records: usize,
    /// Number of pages fetched across all requests for this category
    pub pages: u64,
    /// Whether the category was fetched and written without truncation
    pub complete: bool,
    /// First error encountered, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// File the category was written to, if one was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl BackupReport {
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            collected_at: Utc::now(),
            categories: IndexMap::new(),
        }
    }

    pub fn add(&mut self, category: &str, report: CategoryReport) {
        self.categories.insert(category.to_string(), report);
    }

    /// True when every category was fetched and persisted without loss.
    pub fn is_complete(&self) -> bool {
        self.categories.values().all(|c| c.complete)
    }
}

impl CategoryReport {
    /// Builds the report entry for a fetched collection, before any file
    /// write is recorded.
    pub fn from_outcome<T>(outcome: &FetchOutcome<T>) -> Self {
        let error = match &outcome.status {
            FetchStatus::Complete => None,
            FetchStatus::Truncated(cause) => Some(cause.to_string()),
        };

        Self {
            records: outcome.records.len(),
            pages: outcome.pages,
            complete: outcome.is_complete(),
            error,
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gitlab::TruncationCause;

    fn complete_outcome(len: usize) -> FetchOutcome<u32> {
        FetchOutcome {
            records: (0..len as u32).collect(),
            pages: 1,
            status: FetchStatus::Complete,
        }
    }

    #[test]
    fn test_category_report_from_complete_outcome() {
        let report = CategoryReport::from_outcome(&complete_outcome(3));
        assert_eq!(report.records, 3);
        assert_eq!(report.pages, 1);
        assert!(report.complete);
        assert!(report.error.is_none());
        assert!(report.file.is_none());
    }

    #[test]
    fn test_category_report_from_truncated_outcome() {
        let outcome = FetchOutcome {
            records: vec![1u32],
            pages: 1,
            status: FetchStatus::Truncated(TruncationCause::PageLimit),
        };

        let report = CategoryReport::from_outcome(&outcome);
        assert_eq!(report.records, 1);
        assert!(!report.complete);
        assert!(report.error.is_some());
    }

    #[test]
    fn test_backup_report_completeness() {
        let mut report = BackupReport::new(42);
        report.add("commits", CategoryReport::from_outcome(&complete_outcome(2)));
        assert!(report.is_complete());

        let truncated = FetchOutcome::<u32> {
            records: vec![],
            pages: 0,
            status: FetchStatus::Truncated(TruncationCause::Request("boom".to_string())),
        };
        report.add("issues", CategoryReport::from_outcome(&truncated));
        assert!(!report.is_complete());
    }

    #[test]
    fn test_backup_report_preserves_category_order() {
        let mut report = BackupReport::new(42);
        report.add("commits", CategoryReport::from_outcome(&complete_outcome(1)));
        report.add("merge requests", CategoryReport::from_outcome(&complete_outcome(1)));
        report.add("issues", CategoryReport::from_outcome(&complete_outcome(1)));

        let names: Vec<&String> = report.categories.keys().collect();
        assert_eq!(names, ["commits", "merge requests", "issues"]);

        let json = serde_json::to_string(&report).unwrap();
        let commits_at = json.find("commits").unwrap();
        let issues_at = json.find("issues").unwrap();
        assert!(commits_at < issues_at);
    }
}
