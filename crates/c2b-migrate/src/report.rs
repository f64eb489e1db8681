//! Run reports and non-fatal error records.

use std::fmt;

use tracing::error;

use crate::hierarchy::ContentKind;

/// A non-fatal failure encountered during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// What was being processed (file path, object title, endpoint).
    pub context: String,
    /// What went wrong.
    pub detail: String,
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.detail)
    }
}

/// Append-only list of [`ErrorRecord`]s.
#[derive(Debug, Default)]
pub struct ErrorLog {
    records: Vec<ErrorRecord>,
}

impl ErrorLog {
    /// Log and store a failure.
    pub fn record(&mut self, context: impl Into<String>, detail: impl fmt::Display) {
        let record = ErrorRecord {
            context: context.into(),
            detail: detail.to_string(),
        };
        error!("{record}");
        self.records.push(record);
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recorded failures in order.
    #[must_use]
    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    /// Consume the log.
    #[must_use]
    pub fn into_records(self) -> Vec<ErrorRecord> {
        self.records
    }
}

/// Outcome of a migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub shelves: usize,
    pub books: usize,
    pub chapters: usize,
    pub pages: usize,
    pub errors: Vec<ErrorRecord>,
}

impl MigrationReport {
    /// Number of created objects of a kind.
    #[must_use]
    pub fn created(&self, kind: ContentKind) -> usize {
        match kind {
            ContentKind::Shelf => self.shelves,
            ContentKind::Book => self.books,
            ContentKind::Chapter => self.chapters,
            ContentKind::Page => self.pages,
        }
    }

    /// Total number of created objects.
    #[must_use]
    pub fn total(&self) -> usize {
        self.shelves + self.books + self.chapters + self.pages
    }
}

/// Outcome of clearing the destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub shelves: usize,
    pub books: usize,
    pub errors: Vec<ErrorRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_log_keeps_order() {
        let mut log = ErrorLog::default();
        assert!(log.is_empty());
        log.record("a.html", "File not found");
        log.record("/pages", format_args!("HTTP {}", 500));
        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[1].detail, "HTTP 500");
        assert_eq!(log.into_records()[0].to_string(), "a.html: File not found");
    }

    #[test]
    fn test_report_counts() {
        let report = MigrationReport {
            shelves: 1,
            books: 2,
            chapters: 0,
            pages: 4,
            errors: Vec::new(),
        };
        assert_eq!(report.created(ContentKind::Book), 2);
        assert_eq!(report.total(), 7);
    }
}
