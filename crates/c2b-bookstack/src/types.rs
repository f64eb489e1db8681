//! BookStack request and response types.
//!
//! Response types only include fields that are actually used.
//! Serde ignores unknown fields from the API response.

use serde::{Deserialize, Serialize};

/// Name/value tag attached to any content object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,
    /// Tag value.
    #[serde(default)]
    pub value: String,
}

impl Tag {
    /// Create a tag.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// `POST /shelves` and `PUT /shelves/{id}` body.
#[derive(Debug, Clone, Serialize)]
pub struct ShelfPayload {
    pub name: String,
    pub description_html: String,
    pub books: Vec<u64>,
    pub tags: Vec<Tag>,
}

/// `POST /books` body.
#[derive(Debug, Clone, Serialize)]
pub struct BookPayload {
    pub name: String,
    pub tags: Vec<Tag>,
}

/// `POST /chapters` body.
#[derive(Debug, Clone, Serialize)]
pub struct ChapterPayload {
    pub name: String,
    pub description_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_id: Option<u64>,
    pub tags: Vec<Tag>,
}

/// `POST /pages` body.
#[derive(Debug, Clone, Serialize)]
pub struct PagePayload {
    pub name: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_id: Option<u64>,
    pub tags: Vec<Tag>,
}

/// `PUT /pages/{id}` body.
#[derive(Debug, Clone, Serialize)]
pub struct PageUpdate {
    pub name: String,
    pub html: String,
}

/// Response of any create call.
#[derive(Debug, Clone, Deserialize)]
pub struct Created {
    /// Id of the new object.
    pub id: u64,
}

/// One entry of a list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListedItem {
    /// Object id.
    pub id: u64,
    /// Object name.
    #[serde(default)]
    pub name: String,
}

/// Paginated list response.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    /// Items of this page.
    #[serde(default)]
    pub data: Vec<ListedItem>,
    /// Total number of items across all pages.
    #[serde(default)]
    pub total: Option<u64>,
}

/// Book reference inside a shelf response.
#[derive(Debug, Clone, Deserialize)]
pub struct BookRef {
    /// Book id.
    pub id: u64,
}

/// `GET /shelves/{id}` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShelfDetail {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description_html: String,
    #[serde(default)]
    pub books: Vec<BookRef>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_page_payload_omits_missing_parents() {
        let payload = PagePayload {
            name: "Intro".to_owned(),
            html: "<p>Hi</p>".to_owned(),
            book_id: Some(3),
            chapter_id: None,
            tags: vec![Tag::new("Type", "Page")],
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "name": "Intro",
                "html": "<p>Hi</p>",
                "book_id": 3,
                "tags": [{"name": "Type", "value": "Page"}]
            })
        );
    }

    #[test]
    fn test_shelf_detail_ignores_extra_fields() {
        let detail: ShelfDetail = serde_json::from_value(json!({
            "id": 1,
            "name": "Space",
            "slug": "space",
            "description_html": "<p>d</p>",
            "books": [{"id": 4, "name": "A"}, {"id": 5, "name": "B"}],
            "tags": [{"name": "Source", "value": "Confluence", "order": 0}]
        }))
        .unwrap();
        assert_eq!(detail.name, "Space");
        assert_eq!(detail.books.iter().map(|b| b.id).collect::<Vec<_>>(), [4, 5]);
        assert_eq!(detail.tags, vec![Tag::new("Source", "Confluence")]);
    }

    #[test]
    fn test_listing_without_total() {
        let listing: Listing = serde_json::from_value(json!({
            "data": [{"id": 1, "name": "One"}]
        }))
        .unwrap();
        assert_eq!(listing.data.len(), 1);
        assert_eq!(listing.total, None);
    }
}
