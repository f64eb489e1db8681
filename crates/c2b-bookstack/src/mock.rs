//! Mock content store for testing.
//!
//! Provides [`MockStore`] for unit testing without a BookStack instance.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Value, json};

use crate::error::BookStackError;
use crate::store::{ContentStore, FileUpload, Method};

/// A request seen by [`MockStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Request method.
    pub method: Method,
    /// Request path including any query string.
    pub path: String,
    /// JSON body, if one was sent.
    pub body: Option<Value>,
    /// Filename of the uploaded file, for multipart requests.
    pub upload: Option<String>,
    /// Form fields of the multipart request.
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
enum Scripted {
    Ok(Value),
    Fail { status: u16, body: String },
}

/// Mock content store for testing.
///
/// Records every request and answers with scripted responses. Lookup tries
/// the exact path first, then the path without its query string.
/// Unscripted requests succeed: POSTs return `{"id": n}` with ids counting up
/// from 1, GETs return an empty listing, PUT and DELETE return `{}`.
///
/// # Example
///
/// ```ignore
/// use c2b_bookstack::{ContentStoreExt, Method, MockStore};
/// use serde_json::json;
///
/// let store = MockStore::new()
///     .with_response(Method::Get, "/shelves", json!({"data": [{"id": 1, "name": "A"}]}));
///
/// let shelves = store.list("/shelves").unwrap();
/// assert_eq!(store.count(Method::Get, "/shelves"), 1);
/// ```
#[derive(Debug)]
pub struct MockStore {
    calls: RwLock<Vec<RecordedCall>>,
    responses: RwLock<HashMap<(Method, String), Scripted>>,
    next_id: AtomicU64,
}

impl Default for MockStore {
    fn default() -> Self {
        Self {
            calls: RwLock::new(Vec::new()),
            responses: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl MockStore {
    /// Create a new mock store with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with a successful JSON response.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_response(self, method: Method, path: impl Into<String>, value: Value) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert((method, path.into()), Scripted::Ok(value));
        self
    }

    /// Answer `method path` with an HTTP error.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(
        self,
        method: Method,
        path: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        self.responses.write().unwrap().insert(
            (method, path.into()),
            Scripted::Fail {
                status,
                body: body.into(),
            },
        );
        self
    }

    /// All recorded calls, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().unwrap().clone()
    }

    /// Recorded calls with the given method whose path starts with `prefix`.
    pub fn calls_to(&self, method: Method, prefix: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path.starts_with(prefix))
            .collect()
    }

    /// Number of calls with the given method whose path starts with `prefix`.
    pub fn count(&self, method: Method, prefix: &str) -> usize {
        self.calls_to(method, prefix).len()
    }

    fn scripted(&self, method: Method, path: &str) -> Option<Scripted> {
        let responses = self.responses.read().unwrap();
        responses
            .get(&(method, path.to_owned()))
            .or_else(|| {
                let bare = path.split_once('?').map_or(path, |(p, _)| p);
                responses.get(&(method, bare.to_owned()))
            })
            .cloned()
    }
}

impl ContentStore for MockStore {
    fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        upload: Option<&FileUpload>,
    ) -> Result<Value, BookStackError> {
        self.calls.write().unwrap().push(RecordedCall {
            method,
            path: path.to_owned(),
            body: body.cloned(),
            upload: upload.map(|u| u.filename.clone()),
            fields: upload.map(|u| u.fields.clone()).unwrap_or_default(),
        });

        match self.scripted(method, path) {
            Some(Scripted::Ok(value)) => Ok(value),
            Some(Scripted::Fail { status, body }) => {
                Err(BookStackError::HttpResponse { status, body })
            }
            None => Ok(match method {
                Method::Post => json!({"id": self.next_id.fetch_add(1, Ordering::SeqCst)}),
                Method::Get => json!({"data": [], "total": 0}),
                Method::Put | Method::Delete => json!({}),
            }),
        }
    }
}
