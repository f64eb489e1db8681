//! Confluence export to BookStack migration.
//!
//! This crate turns a Confluence HTML space export into BookStack content:
//! - [`hierarchy`]: parses the export's `index.html` into an [`ExportNode`] tree
//! - [`ContentTransformer`]: extracts titles and rebuilds document bodies
//! - [`Migrator`]: creates shelves, books, chapters and pages in order
//! - [`clear`]: removes all shelves and books from the destination
//!
//! The destination is any [`c2b_bookstack::ContentStore`].
//!
//! # Example
//!
//! ```ignore
//! use c2b_bookstack::BookStackClient;
//! use c2b_migrate::{MigrationOptions, Migrator};
//!
//! let client = BookStackClient::from_config("https://wiki.example.com", "id", "secret", 30);
//! let report = Migrator::new(&client, "export/", MigrationOptions::default()).run()?;
//! println!("{} pages, {} errors", report.pages, report.errors.len());
//! ```

mod content;
mod dom;
mod error;
pub mod hierarchy;
mod migrator;
mod report;
mod source;

pub use content::{AttachmentCache, ContentTransformer, Extracted};
pub use error::MigrateError;
pub use hierarchy::{ContentKind, ExportNode};
pub use migrator::{CreatedObject, Export, MigrationOptions, Migrator, clear, load_export};
pub use report::{ClearReport, ErrorLog, ErrorRecord, MigrationReport};
pub use source::SourceFiles;
