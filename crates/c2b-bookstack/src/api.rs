//! Typed operations on top of [`ContentStore`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::error::BookStackError;
use crate::store::{ContentStore, FileUpload, Method};
use crate::types::{Created, ListedItem, Listing};

/// Page size used when walking list endpoints (BookStack's maximum).
const LIST_PAGE_SIZE: usize = 500;

/// Typed helpers available on every [`ContentStore`].
pub trait ContentStoreExt: ContentStore {
    /// Create an object and return its id.
    fn create<T: Serialize>(&self, endpoint: &str, payload: &T) -> Result<u64, BookStackError> {
        let body = serde_json::to_value(payload)?;
        let response = self.request(Method::Post, endpoint, Some(&body), None)?;
        let created: Created = serde_json::from_value(response)?;
        Ok(created.id)
    }

    /// Update an object in place.
    fn update<T: Serialize>(
        &self,
        endpoint: &str,
        id: u64,
        payload: &T,
    ) -> Result<(), BookStackError> {
        let body = serde_json::to_value(payload)?;
        self.request(Method::Put, &format!("{endpoint}/{id}"), Some(&body), None)?;
        Ok(())
    }

    /// Fetch and deserialize a single resource.
    fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, BookStackError> {
        let response = self.request(Method::Get, path, None, None)?;
        Ok(serde_json::from_value(response)?)
    }

    /// List every object of an endpoint, following pagination.
    fn list(&self, endpoint: &str) -> Result<Vec<ListedItem>, BookStackError> {
        let mut items = Vec::new();
        loop {
            let path = format!("{endpoint}?count={LIST_PAGE_SIZE}&offset={}", items.len());
            let page: Listing = self.fetch(&path)?;
            let received = page.data.len();
            items.extend(page.data);

            let reached_total = page
                .total
                .is_some_and(|total| items.len() as u64 >= total);
            if received < LIST_PAGE_SIZE || reached_total {
                return Ok(items);
            }
        }
    }

    /// Delete an object.
    fn delete(&self, endpoint: &str, id: u64) -> Result<(), BookStackError> {
        self.request(Method::Delete, &format!("{endpoint}/{id}"), None, None)?;
        Ok(())
    }

    /// Upload a file as an attachment of a page and return the attachment id.
    fn upload_attachment(
        &self,
        page_id: u64,
        filename: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<u64, BookStackError> {
        info!("Uploading attachment '{}' to page {}", filename, page_id);
        let upload = FileUpload {
            filename: filename.to_owned(),
            content_type: content_type.to_owned(),
            data,
            fields: vec![
                ("name".to_owned(), filename.to_owned()),
                ("uploaded_to".to_owned(), page_id.to_string()),
            ],
        };
        let response = self.request(Method::Post, "/attachments", None, Some(&upload))?;
        let created: Created = serde_json::from_value(response)?;
        Ok(created.id)
    }

    /// Check that the API is reachable and the credentials are accepted.
    fn verify(&self) -> Result<(), BookStackError> {
        let response: Value = self.request(Method::Get, "/shelves?count=1", None, None)?;
        if response.get("data").is_some() {
            Ok(())
        } else {
            Err(BookStackError::UnexpectedResponse(
                "shelf listing has no data field".to_owned(),
            ))
        }
    }
}

impl<S: ContentStore + ?Sized> ContentStoreExt for S {}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;

    /// Serves `total` numbered items in pages, recording requested paths.
    struct PagedStore {
        total: u64,
        paths: RefCell<Vec<String>>,
    }

    impl ContentStore for PagedStore {
        fn request(
            &self,
            _method: Method,
            path: &str,
            _body: Option<&Value>,
            _upload: Option<&FileUpload>,
        ) -> Result<Value, BookStackError> {
            self.paths.borrow_mut().push(path.to_owned());
            let offset: u64 = path
                .rsplit_once("offset=")
                .and_then(|(_, o)| o.parse().ok())
                .unwrap_or(0);
            let end = (offset + LIST_PAGE_SIZE as u64).min(self.total);
            let data: Vec<Value> = (offset..end)
                .map(|id| json!({"id": id + 1, "name": format!("item {id}")}))
                .collect();
            Ok(json!({"data": data, "total": self.total}))
        }
    }

    #[test]
    fn test_list_follows_pagination() {
        let store = PagedStore {
            total: 1200,
            paths: RefCell::new(Vec::new()),
        };
        let items = store.list("/books").unwrap();
        assert_eq!(items.len(), 1200);
        assert_eq!(
            *store.paths.borrow(),
            [
                "/books?count=500&offset=0",
                "/books?count=500&offset=500",
                "/books?count=500&offset=1000",
            ]
        );
    }

    #[test]
    fn test_list_exact_page_stops_at_total() {
        let store = PagedStore {
            total: 500,
            paths: RefCell::new(Vec::new()),
        };
        assert_eq!(store.list("/shelves").unwrap().len(), 500);
        assert_eq!(store.paths.borrow().len(), 1);
    }

    #[test]
    fn test_list_empty() {
        let store = PagedStore {
            total: 0,
            paths: RefCell::new(Vec::new()),
        };
        assert!(store.list("/shelves").unwrap().is_empty());
    }
}
