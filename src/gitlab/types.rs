use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A project associated with the backed-up user.
///
/// Only the fields the backup traverses are typed; everything else the API
/// returned is carried in `rest` so records serialize back intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// A commit authored by the backed-up user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// A merge request or issue record.
///
/// Both expose the owning project id and the per-project `iid` that the
/// notes endpoint is addressed by, and are otherwise opaque.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceItem {
    pub iid: u64,
    pub project_id: u64,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// A comment (GitLab "note") on a merge request or issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub author: NoteAuthor,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteAuthor {
    pub id: u64,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// The two resource collections whose notes are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    MergeRequests,
    Issues,
}

impl ResourceKind {
    /// URL path segment for the resource collection.
    pub fn path(self) -> &'static str {
        match self {
            Self::MergeRequests => "merge_requests",
            Self::Issues => "issues",
        }
    }

    /// Label for one resource, used in log lines.
    pub fn singular(self) -> &'static str {
        match self {
            Self::MergeRequests => "merge request",
            Self::Issues => "issue",
        }
    }

    /// Label for the whole collection, used in log lines.
    pub fn plural(self) -> &'static str {
        match self {
            Self::MergeRequests => "merge requests",
            Self::Issues => "issues",
        }
    }
}
