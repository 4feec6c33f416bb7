use std::fmt;

/// Why a paginated fetch stopped before the server ran out of pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TruncationCause {
    /// A page request failed; pages fetched before it are kept.
    Request(String),
    /// The configured page limit was reached.
    PageLimit,
}

impl fmt::Display for TruncationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(message) => write!(f, "request failed: {message}"),
            Self::PageLimit => write!(f, "page limit reached"),
        }
    }
}

/// Completeness marker for one fetched collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Complete,
    Truncated(TruncationCause),
}

/// Result of draining one paginated collection.
///
/// A failed page never discards the pages fetched before it: the records
/// are kept and `status` says how the fetch ended. Within `records`, each
/// page's entries follow all prior pages' entries.
#[derive(Debug)]
pub struct FetchOutcome<T> {
    pub records: Vec<T>,
    pub pages: u64,
    pub status: FetchStatus,
}

impl<T> FetchOutcome<T> {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            pages: 0,
            status: FetchStatus::Complete,
        }
    }

    /// An outcome for a fetch that could not even start.
    pub fn failed(message: String) -> Self {
        Self {
            records: Vec::new(),
            pages: 0,
            status: FetchStatus::Truncated(TruncationCause::Request(message)),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.status, FetchStatus::Complete)
    }

    /// Folds another outcome into this one, appending its records and
    /// keeping the first truncation cause seen.
    pub fn absorb(&mut self, other: Self) {
        self.records.extend(other.records);
        self.pages += other.pages;
        if self.is_complete() {
            self.status = other.status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_appends_records_in_order() {
        let mut all = FetchOutcome::empty();
        all.absorb(FetchOutcome {
            records: vec![1, 2],
            pages: 1,
            status: FetchStatus::Complete,
        });
        all.absorb(FetchOutcome {
            records: vec![3],
            pages: 2,
            status: FetchStatus::Complete,
        });

        assert_eq!(all.records, [1, 2, 3]);
        assert_eq!(all.pages, 3);
        assert!(all.is_complete());
    }

    #[test]
    fn test_absorb_keeps_first_truncation_cause() {
        let mut all = FetchOutcome::<u32>::empty();
        all.absorb(FetchOutcome {
            records: vec![],
            pages: 1,
            status: FetchStatus::Truncated(TruncationCause::PageLimit),
        });
        all.absorb(FetchOutcome {
            records: vec![],
            pages: 1,
            status: FetchStatus::Truncated(TruncationCause::Request("later".to_string())),
        });

        assert_eq!(
            all.status,
            FetchStatus::Truncated(TruncationCause::PageLimit)
        );
    }

    #[test]
    fn test_absorb_truncated_after_complete() {
        let mut all = FetchOutcome::empty();
        all.absorb(FetchOutcome {
            records: vec![1],
            pages: 1,
            status: FetchStatus::Complete,
        });
        all.absorb(FetchOutcome {
            records: vec![2],
            pages: 1,
            status: FetchStatus::Truncated(TruncationCause::Request("boom".to_string())),
        });

        assert_eq!(all.records, [1, 2]);
        assert!(!all.is_complete());
    }
}
