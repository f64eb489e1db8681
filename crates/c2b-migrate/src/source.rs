//! Access to files of the export.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use percent_encoding::percent_decode_str;

use crate::report::ErrorLog;

/// Reads export documents relative to the export root.
///
/// Document contents are cached per path for the duration of a run. Read
/// failures are cached too, so a broken reference is reported once no matter
/// how often it is followed.
#[derive(Debug)]
pub struct SourceFiles {
    root: PathBuf,
    documents: HashMap<PathBuf, Option<Rc<str>>>,
}

impl SourceFiles {
    /// Create a reader rooted at the export root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            documents: HashMap::new(),
        }
    }

    /// Resolve an href against the export root.
    ///
    /// Query strings and fragments are dropped and percent-escapes decoded.
    #[must_use]
    pub fn resolve(&self, href: &str) -> PathBuf {
        let end = href.find(['?', '#']).unwrap_or(href.len());
        let decoded = percent_decode_str(&href[..end]).decode_utf8_lossy();
        self.root.join(decoded.as_ref())
    }

    /// Read an HTML document, recording an error on its first failed read.
    pub fn document(&mut self, href: &str, errors: &mut ErrorLog) -> Option<Rc<str>> {
        let path = self.resolve(href);
        if let Some(cached) = self.documents.get(&path) {
            return cached.clone();
        }
        let content = match fs::read_to_string(&path) {
            Ok(text) => Some(Rc::from(text)),
            Err(e) => {
                errors.record(path.display().to_string(), e);
                None
            }
        };
        self.documents.insert(path, content.clone());
        content
    }

    /// Read a binary resource. Not cached.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    pub fn bytes(&self, href: &str) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(href))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_decodes_and_strips_fragment() {
        let files = SourceFiles::new("/export");
        assert_eq!(
            files.resolve("My%20Page_12.html#section"),
            PathBuf::from("/export/My Page_12.html")
        );
        assert_eq!(
            files.resolve("attachments/1/2.png?version=1"),
            PathBuf::from("/export/attachments/1/2.png")
        );
    }

    #[test]
    fn test_document_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.html"), "first").unwrap();
        let mut files = SourceFiles::new(dir.path());
        let mut errors = ErrorLog::default();

        assert_eq!(files.document("a.html", &mut errors).as_deref(), Some("first"));
        fs::write(dir.path().join("a.html"), "second").unwrap();
        assert_eq!(files.document("a.html", &mut errors).as_deref(), Some("first"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_missing_document_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = SourceFiles::new(dir.path());
        let mut errors = ErrorLog::default();

        assert!(files.document("gone.html", &mut errors).is_none());
        assert!(files.document("gone.html", &mut errors).is_none());
        assert_eq!(errors.len(), 1);
        assert!(errors.records()[0].context.ends_with("gone.html"));
    }

    #[test]
    fn test_bytes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x.bin"), [1u8, 2, 3]).unwrap();
        let files = SourceFiles::new(dir.path());
        assert_eq!(files.bytes("x.bin").unwrap(), [1, 2, 3]);
        assert!(files.bytes("y.bin").is_err());
    }
}
