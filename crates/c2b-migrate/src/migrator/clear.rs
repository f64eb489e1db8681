//! Destructive removal of existing destination content.

use c2b_bookstack::{ContentStore, ContentStoreExt};
use tracing::info;

use crate::hierarchy::ContentKind;
use crate::report::{ClearReport, ErrorLog};

/// Delete every shelf, then every book, at the destination.
///
/// Deleting books removes their chapters and pages with them. Failures are
/// recorded and the remaining deletions still run.
pub fn clear(store: &dyn ContentStore) -> ClearReport {
    info!("Clearing existing BookStack content");
    let mut errors = ErrorLog::default();
    let shelves = delete_all(store, ContentKind::Shelf, &mut errors);
    let books = delete_all(store, ContentKind::Book, &mut errors);
    ClearReport {
        shelves,
        books,
        errors: errors.into_records(),
    }
}

fn delete_all(store: &dyn ContentStore, kind: ContentKind, errors: &mut ErrorLog) -> usize {
    let endpoint = kind.endpoint();
    let items = match store.list(endpoint) {
        Ok(items) => items,
        Err(e) => {
            errors.record(format!("Listing {endpoint}"), e);
            return 0;
        }
    };
    info!("Found {} {kind} object(s) to delete", items.len());

    let mut deleted = 0;
    for item in items {
        match store.delete(endpoint, item.id) {
            Ok(()) => {
                info!("Deleted {kind}: '{}' (ID: {})", item.name, item.id);
                deleted += 1;
            }
            Err(e) => errors.record(format!("Deleting {kind} '{}' ({})", item.name, item.id), e),
        }
    }
    deleted
}

#[cfg(test)]
mod tests {
    use c2b_bookstack::{Method, MockStore};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_failed_listing_does_not_stop_books() {
        let store = MockStore::new()
            .with_failure(Method::Get, "/shelves", 500, "boom")
            .with_response(
                Method::Get,
                "/books",
                json!({"data": [{"id": 1, "name": "B"}], "total": 1}),
            );

        let report = clear(&store);

        assert_eq!(report.shelves, 0);
        assert_eq!(report.books, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].context, "Listing /shelves");
    }

    #[test]
    fn test_failed_delete_continues() {
        let store = MockStore::new()
            .with_response(
                Method::Get,
                "/books",
                json!({"data": [{"id": 1, "name": "A"}, {"id": 2, "name": "B"}], "total": 2}),
            )
            .with_failure(Method::Delete, "/books/1", 403, "forbidden");

        let report = clear(&store);

        assert_eq!(report.books, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(store.count(Method::Delete, "/books/"), 2);
    }
}
