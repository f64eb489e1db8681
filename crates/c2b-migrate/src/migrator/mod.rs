//! Migration of an export into BookStack.
//!
//! [`Migrator::run`] walks the export hierarchy depth first and creates one
//! BookStack object per node, parents before children:
//!
//! 1. Shelves (depth 1) are created with the space description
//! 2. Books (depth 2) get a companion page holding the document content
//! 3. Chapters (depth 3) with children become a chapter plus companion page;
//!    childless ones become a plain page in the current book
//! 4. Everything deeper becomes a page
//!
//! Once the tree is done, each shelf is updated to list the books created
//! under it. Individual failures are recorded in the report and the run
//! continues; children of a failed object are created without that parent.

mod clear;
mod records;

pub use clear::clear;
pub use records::CreatedObject;

use std::path::{Path, PathBuf};

use c2b_bookstack::types::{
    BookPayload, ChapterPayload, PagePayload, PageUpdate, ShelfDetail, ShelfPayload, Tag,
};
use c2b_bookstack::{BookStackError, ContentStore, ContentStoreExt};
use serde::Serialize;
use tracing::{info, warn};

use crate::content::ContentTransformer;
use crate::error::MigrateError;
use crate::hierarchy::{ContentKind, ExportNode, find_index, parse_index};
use crate::report::{ErrorLog, MigrationReport};

use records::CreatedObjects;

/// Options of a migration run.
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Embed images and upload attachments after creating each page.
    pub attachments: bool,
    /// Value of the `Source` tag on every created object.
    pub source_tag: String,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            attachments: false,
            source_tag: "Confluence".to_owned(),
        }
    }
}

/// A located and parsed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Directory containing `index.html`; the source root if none was found.
    pub root: PathBuf,
    /// Top-level hierarchy nodes.
    pub nodes: Vec<ExportNode>,
}

/// Locate the export under `source_root` and parse its hierarchy.
///
/// A missing or unreadable index yields an empty hierarchy; read failures
/// are recorded in `errors`.
///
/// # Errors
///
/// Returns [`MigrateError::SourceNotFound`] if `source_root` is not a
/// directory.
pub fn load_export(source_root: &Path, errors: &mut ErrorLog) -> Result<Export, MigrateError> {
    if !source_root.is_dir() {
        return Err(MigrateError::SourceNotFound(source_root.to_path_buf()));
    }
    let Some(index) = find_index(source_root) else {
        warn!("No index.html found under {}", source_root.display());
        return Ok(Export {
            root: source_root.to_path_buf(),
            nodes: Vec::new(),
        });
    };
    info!("Found index.html at {}", index.display());

    let root = index.parent().unwrap_or(source_root).to_path_buf();
    let nodes = parse_index(&index, errors);
    Ok(Export { root, nodes })
}

/// Parent ids in effect while visiting a node.
#[derive(Debug, Clone, Copy, Default)]
struct Ancestors {
    shelf: Option<u64>,
    book: Option<u64>,
    chapter: Option<u64>,
}

/// Migrates one export into BookStack.
pub struct Migrator<'a> {
    store: &'a dyn ContentStore,
    source_root: PathBuf,
    options: MigrationOptions,
    created: CreatedObjects,
    errors: ErrorLog,
}

impl<'a> Migrator<'a> {
    /// Create a migrator for the export under `source_root`.
    pub fn new(
        store: &'a dyn ContentStore,
        source_root: impl Into<PathBuf>,
        options: MigrationOptions,
    ) -> Self {
        Self {
            store,
            source_root: source_root.into(),
            options,
            created: CreatedObjects::default(),
            errors: ErrorLog::default(),
        }
    }

    /// Run the migration.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::SourceNotFound`] if the source root does not
    /// exist. All other failures are recorded in the report.
    pub fn run(mut self) -> Result<MigrationReport, MigrateError> {
        let export = load_export(&self.source_root, &mut self.errors)?;
        if export.nodes.is_empty() {
            warn!("No hierarchy found, nothing to migrate");
        }

        let mut transformer = ContentTransformer::new(self.store, export.root);
        for node in &export.nodes {
            self.visit(&mut transformer, node, Ancestors::default());
        }
        self.link_books_to_shelves();

        if self.options.attachments {
            info!("Uploaded {} attachment(s)", transformer.attachments().len());
        }
        Ok(self.into_report())
    }

    fn visit(
        &mut self,
        transformer: &mut ContentTransformer<'_>,
        node: &ExportNode,
        ancestors: Ancestors,
    ) {
        let mut ancestors = ancestors;
        match node.kind() {
            Some(ContentKind::Shelf) => {
                ancestors.shelf = self.create_shelf(transformer, node);
            }
            Some(ContentKind::Book) => {
                let book_id = self.create_book(transformer, node, ancestors.shelf);
                self.create_page(transformer, node, book_id, None);
                ancestors.book = book_id;
                ancestors.chapter = None;
            }
            Some(ContentKind::Chapter) if node.children.is_empty() => {
                self.create_page(transformer, node, ancestors.book, None);
            }
            Some(ContentKind::Chapter) => {
                let chapter_id = self.create_chapter(transformer, node, ancestors.book);
                self.create_page(transformer, node, ancestors.book, chapter_id);
                ancestors.chapter = chapter_id;
            }
            Some(ContentKind::Page) => {
                self.create_page(transformer, node, ancestors.book, ancestors.chapter);
            }
            None => warn!(
                "Unrecognized depth {} for '{}', skipping",
                node.depth, node.title
            ),
        }

        for child in &node.children {
            self.visit(transformer, child, ancestors);
        }
    }

    fn create_shelf(
        &mut self,
        transformer: &mut ContentTransformer<'_>,
        node: &ExportNode,
    ) -> Option<u64> {
        let kind = ContentKind::Shelf;
        let extracted = transformer.extract(&node.href, kind, None, &mut self.errors);
        let payload = ShelfPayload {
            name: display_name(extracted.title, node),
            description_html: extracted.html,
            books: Vec::new(),
            tags: self.tags(kind),
        };
        let id = self.create(kind, &payload.name, &payload)?;
        self.record(kind, payload.name, id, None);
        Some(id)
    }

    fn create_book(
        &mut self,
        transformer: &mut ContentTransformer<'_>,
        node: &ExportNode,
        shelf_id: Option<u64>,
    ) -> Option<u64> {
        let kind = ContentKind::Book;
        let extracted = transformer.extract(&node.href, kind, None, &mut self.errors);
        let payload = BookPayload {
            name: display_name(extracted.title, node),
            tags: self.tags(kind),
        };
        let id = self.create(kind, &payload.name, &payload)?;
        self.record(kind, payload.name, id, shelf_id);
        Some(id)
    }

    fn create_chapter(
        &mut self,
        transformer: &mut ContentTransformer<'_>,
        node: &ExportNode,
        book_id: Option<u64>,
    ) -> Option<u64> {
        let kind = ContentKind::Chapter;
        let extracted = transformer.extract(&node.href, kind, None, &mut self.errors);
        let payload = ChapterPayload {
            name: display_name(extracted.title, node),
            description_html: extracted.html,
            book_id,
            tags: self.tags(kind),
        };
        let id = self.create(kind, &payload.name, &payload)?;
        self.record(kind, payload.name, id, None);
        Some(id)
    }

    /// Create a page, then fill in attachments once its id is known.
    fn create_page(
        &mut self,
        transformer: &mut ContentTransformer<'_>,
        node: &ExportNode,
        book_id: Option<u64>,
        chapter_id: Option<u64>,
    ) -> Option<u64> {
        let kind = ContentKind::Page;
        let extracted = transformer.extract(&node.href, kind, None, &mut self.errors);
        let payload = PagePayload {
            name: display_name(extracted.title, node),
            html: extracted.html,
            book_id,
            chapter_id,
            tags: self.tags(kind),
        };
        let id = self.create(kind, &payload.name, &payload)?;

        if self.options.attachments {
            let extracted = transformer.extract(&node.href, kind, Some(id), &mut self.errors);
            let update = PageUpdate {
                name: payload.name.clone(),
                html: extracted.html,
            };
            if let Err(e) = self.store.update(kind.endpoint(), id, &update) {
                self.errors
                    .record(format!("Updating {kind} '{}'", payload.name), e);
            }
        }

        self.record(kind, payload.name, id, None);
        Some(id)
    }

    fn create<T: Serialize>(&mut self, kind: ContentKind, name: &str, payload: &T) -> Option<u64> {
        match self.store.create(kind.endpoint(), payload) {
            Ok(id) => {
                info!("{kind} created: '{name}' (ID: {id})");
                Some(id)
            }
            Err(e) => {
                self.errors.record(format!("Creating {kind} '{name}'"), e);
                None
            }
        }
    }

    fn record(&mut self, kind: ContentKind, title: String, id: u64, shelf_id: Option<u64>) {
        self.created.insert(CreatedObject {
            title,
            id,
            kind,
            shelf_id,
        });
    }

    fn tags(&self, kind: ContentKind) -> Vec<Tag> {
        vec![
            Tag::new("Source", self.options.source_tag.as_str()),
            Tag::new("Type", kind.as_str()),
        ]
    }

    /// Attach each shelf's books to it.
    fn link_books_to_shelves(&mut self) {
        let shelves: Vec<(u64, String)> = self
            .created
            .shelves()
            .map(|shelf| (shelf.id, shelf.title.clone()))
            .collect();
        for (shelf_id, title) in shelves {
            let books = self.created.books_on_shelf(shelf_id);
            if books.is_empty() {
                continue;
            }
            match self.link_shelf(shelf_id, &books) {
                Ok(()) => info!("Shelf '{title}' updated with {} book(s)", books.len()),
                Err(e) => self.errors.record(format!("Linking shelf '{title}'"), e),
            }
        }
    }

    fn link_shelf(&self, shelf_id: u64, books: &[u64]) -> Result<(), BookStackError> {
        let endpoint = ContentKind::Shelf.endpoint();
        let shelf: ShelfDetail = self.store.fetch(&format!("{endpoint}/{shelf_id}"))?;

        let mut book_ids: Vec<u64> = shelf.books.iter().map(|book| book.id).collect();
        for id in books {
            if !book_ids.contains(id) {
                book_ids.push(*id);
            }
        }

        let payload = ShelfPayload {
            name: shelf.name,
            description_html: shelf.description_html,
            books: book_ids,
            tags: shelf.tags,
        };
        self.store.update(endpoint, shelf_id, &payload)
    }

    fn into_report(self) -> MigrationReport {
        MigrationReport {
            shelves: self.created.count(ContentKind::Shelf),
            books: self.created.count(ContentKind::Book),
            chapters: self.created.count(ContentKind::Chapter),
            pages: self.created.count(ContentKind::Page),
            errors: self.errors.into_records(),
        }
    }
}

/// Object name: the document title, or the index link text without one.
fn display_name(title: String, node: &ExportNode) -> String {
    if title.is_empty() {
        node.title.clone()
    } else {
        title
    }
}
