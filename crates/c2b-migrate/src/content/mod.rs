//! Conversion of export documents into BookStack content.
//!
//! [`ContentTransformer`] reads an export document, extracts its title and
//! rebuilds the relevant part of its body:
//!
//! - only allow-listed attributes survive
//! - local images are embedded as `data:` URLs
//! - linked PDFs are uploaded and replaced by a viewer placeholder
//! - links to other export documents point at the target's slug
//!
//! Images, PDFs and the `div.greybox` attachment list are only handled when
//! the destination page id is known, since uploads need a page to attach to.

mod attachments;
mod images;
mod rebuild;
mod slug;

pub use attachments::AttachmentCache;

use std::collections::HashMap;
use std::path::PathBuf;

use c2b_bookstack::ContentStore;
use tracing::debug;

use crate::dom::Document;
use crate::hierarchy::ContentKind;
use crate::report::ErrorLog;
use crate::source::SourceFiles;

/// Number of paragraphs used when a page has no `div#main-content`.
const FALLBACK_PARAGRAPHS: usize = 3;

/// Title and rebuilt body of an export document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub title: String,
    pub html: String,
}

/// Reads export documents and rebuilds their content.
pub struct ContentTransformer<'a> {
    store: &'a dyn ContentStore,
    files: SourceFiles,
    attachments: AttachmentCache,
    slugs: HashMap<PathBuf, Option<String>>,
}

impl<'a> ContentTransformer<'a> {
    /// Create a transformer for the export rooted at `export_root`.
    pub fn new(store: &'a dyn ContentStore, export_root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            files: SourceFiles::new(export_root),
            attachments: AttachmentCache::default(),
            slugs: HashMap::new(),
        }
    }

    /// Uploads made so far.
    #[must_use]
    pub fn attachments(&self) -> &AttachmentCache {
        &self.attachments
    }

    /// Extract the title and body of `href` for an object of `kind`.
    ///
    /// An unreadable document yields empty title and body, with an error
    /// recorded on its first failed read.
    pub fn extract(
        &mut self,
        href: &str,
        kind: ContentKind,
        page_id: Option<u64>,
        errors: &mut ErrorLog,
    ) -> Extracted {
        let Some(source) = self.files.document(href, errors) else {
            return Extracted::default();
        };
        let doc = Document::parse(&source);
        let title = doc.title();

        let mut html = String::new();
        match kind {
            ContentKind::Page => {
                if let Some(main) = doc.element_by_id("div", "main-content") {
                    self.rebuild(&doc, main, page_id, errors, &mut html);
                } else {
                    debug!("No main-content in {href}, using leading paragraphs");
                    let paragraphs = doc.find_all(doc.root(), |n| doc.is_tag(n, "p"));
                    for &p in paragraphs.iter().take(FALLBACK_PARAGRAPHS) {
                        self.rebuild(&doc, p, page_id, errors, &mut html);
                    }
                }
                if let Some(page_id) = page_id {
                    self.upload_greybox(&doc, page_id, errors);
                }
            }
            ContentKind::Shelf => {
                if let Some(cell) = doc.elements_with_class("div", "innerCell").first() {
                    self.rebuild(&doc, *cell, page_id, errors, &mut html);
                }
            }
            ContentKind::Book | ContentKind::Chapter => {}
        }

        Extracted { title, html }
    }

    /// Upload the files listed in `div.greybox` blocks.
    fn upload_greybox(&mut self, doc: &Document, page_id: u64, errors: &mut ErrorLog) {
        for greybox in doc.elements_with_class("div", "greybox") {
            for link in doc.find_all(greybox, |n| doc.is_tag(n, "a")) {
                let Some(href) = doc.attr(link, "href") else {
                    continue;
                };
                if !href.starts_with("attachments/") {
                    continue;
                }
                let text = doc.text_content(link);
                let filename = match text.trim() {
                    "" => href.rsplit('/').next().unwrap_or(href),
                    name => name,
                };
                self.attachments.upload(
                    self.store,
                    &self.files,
                    page_id,
                    href,
                    filename,
                    errors,
                );
            }
        }
    }

    /// Slug of the title of the export document at `href`.
    ///
    /// `None` if the document cannot be read (reported once) or has no
    /// usable title.
    fn link_slug(&mut self, href: &str, errors: &mut ErrorLog) -> Option<String> {
        let path = self.files.resolve(href);
        if let Some(cached) = self.slugs.get(&path) {
            return cached.clone();
        }
        let slug = self.files.document(href, errors).and_then(|source| {
            let slug = slug::slugify(&Document::parse(&source).title());
            if slug.is_empty() {
                debug!("Link target {href} has no title, keeping link");
                None
            } else {
                Some(slug)
            }
        });
        self.slugs.insert(path, slug.clone());
        slug
    }
}
