//! BookStack integration for c2b.
//!
//! This crate provides the destination side of a migration:
//! - [`ContentStore`]: the request capability the migrator is written against
//! - [`ContentStoreExt`]: typed create/update/list/delete/upload helpers
//! - [`BookStackClient`]: REST API client with token authentication
//! - [`MockStore`] for testing (behind `mock` feature flag)
//!
//! # API Client
//!
//! ```ignore
//! use c2b_bookstack::{BookStackClient, ContentStoreExt};
//!
//! let client = BookStackClient::from_config("https://wiki.example.com", "id", "secret", 30);
//! client.verify()?;
//! let shelves = client.list("/shelves")?;
//! println!("{} shelves", shelves.len());
//! ```

mod api;
mod client;
pub mod error;
mod store;
pub mod types;

#[cfg(feature = "mock")]
mod mock;

pub use api::ContentStoreExt;
pub use client::BookStackClient;
pub use error::BookStackError;
pub use store::{ContentStore, FileUpload, Method};

#[cfg(feature = "mock")]
pub use mock::{MockStore, RecordedCall};
