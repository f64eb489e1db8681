//! Objects created during a run.

use std::collections::BTreeMap;

use crate::hierarchy::ContentKind;

/// A destination object created by the migrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedObject {
    pub title: String,
    pub id: u64,
    pub kind: ContentKind,
    /// Owning shelf, for books.
    pub shelf_id: Option<u64>,
}

/// Created objects per kind, keyed by destination id.
#[derive(Debug, Default)]
pub(crate) struct CreatedObjects {
    shelves: BTreeMap<u64, CreatedObject>,
    books: BTreeMap<u64, CreatedObject>,
    chapters: BTreeMap<u64, CreatedObject>,
    pages: BTreeMap<u64, CreatedObject>,
}

impl CreatedObjects {
    fn table(&self, kind: ContentKind) -> &BTreeMap<u64, CreatedObject> {
        match kind {
            ContentKind::Shelf => &self.shelves,
            ContentKind::Book => &self.books,
            ContentKind::Chapter => &self.chapters,
            ContentKind::Page => &self.pages,
        }
    }

    pub(crate) fn insert(&mut self, object: CreatedObject) {
        let table = match object.kind {
            ContentKind::Shelf => &mut self.shelves,
            ContentKind::Book => &mut self.books,
            ContentKind::Chapter => &mut self.chapters,
            ContentKind::Page => &mut self.pages,
        };
        table.insert(object.id, object);
    }

    pub(crate) fn count(&self, kind: ContentKind) -> usize {
        self.table(kind).len()
    }

    pub(crate) fn shelves(&self) -> impl Iterator<Item = &CreatedObject> {
        self.shelves.values()
    }

    /// Ids of created books belonging to a shelf, in id order.
    pub(crate) fn books_on_shelf(&self, shelf_id: u64) -> Vec<u64> {
        self.books
            .values()
            .filter(|book| book.shelf_id == Some(shelf_id))
            .map(|book| book.id)
            .collect()
    }
}
