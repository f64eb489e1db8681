//! Attachment upload with per-page deduplication.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use c2b_bookstack::{ContentStore, ContentStoreExt};
use tracing::debug;

use super::images::attachment_type;
use crate::report::ErrorLog;
use crate::source::SourceFiles;

/// Remembers which export files were uploaded to which page.
///
/// A file referenced several times on one page is uploaded once; later
/// references reuse the stored attachment id. Failures are not cached, so a
/// later reference retries.
#[derive(Debug, Default)]
pub struct AttachmentCache {
    uploaded: HashMap<(u64, PathBuf), u64>,
}

impl AttachmentCache {
    /// Attachment id of a previous upload.
    #[must_use]
    pub fn get(&self, page_id: u64, path: &Path) -> Option<u64> {
        self.uploaded.get(&(page_id, path.to_path_buf())).copied()
    }

    /// Number of distinct uploads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.uploaded.len()
    }

    /// Whether nothing was uploaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uploaded.is_empty()
    }

    /// Upload `href` as `filename` to a page, or return the earlier upload.
    ///
    /// Returns `None` (with an error recorded) if the file cannot be read or
    /// the upload fails.
    pub fn upload(
        &mut self,
        store: &dyn ContentStore,
        files: &SourceFiles,
        page_id: u64,
        href: &str,
        filename: &str,
        errors: &mut ErrorLog,
    ) -> Option<u64> {
        let path = files.resolve(href);
        if let Some(id) = self.get(page_id, &path) {
            debug!("Attachment already uploaded: {filename}");
            return Some(id);
        }

        let data = match files.bytes(href) {
            Ok(data) => data,
            Err(e) => {
                errors.record(filename, format_args!("{}: {e}", path.display()));
                return None;
            }
        };
        match store.upload_attachment(page_id, filename, data, attachment_type(href)) {
            Ok(id) => {
                self.uploaded.insert((page_id, path), id);
                Some(id)
            }
            Err(e) => {
                errors.record(filename, e);
                None
            }
        }
    }
}
