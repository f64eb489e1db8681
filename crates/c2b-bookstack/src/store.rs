//! The request capability consumed by the migrator.

use std::fmt;

use serde_json::Value;

use crate::error::BookStackError;

/// HTTP method supported by the BookStack API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Upper-case method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file sent as `multipart/form-data`.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Filename reported in the `file` part.
    pub filename: String,
    /// MIME type of the file part.
    pub content_type: String,
    /// File contents.
    pub data: Vec<u8>,
    /// Plain form fields sent alongside the file, in order.
    pub fields: Vec<(String, String)>,
}

/// Authenticated access to a BookStack instance.
///
/// Paths are relative to the API root (e.g. `/shelves`, `/pages/12`).
/// Implementations translate every failure into [`BookStackError`]; a
/// request never panics.
pub trait ContentStore {
    /// Perform a request.
    ///
    /// A POST with `upload` is sent as multipart form data; otherwise
    /// POST/PUT send `body` as JSON. Successful responses without a body
    /// (including 204) yield an empty JSON object.
    fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        upload: Option<&FileUpload>,
    ) -> Result<Value, BookStackError>;
}
