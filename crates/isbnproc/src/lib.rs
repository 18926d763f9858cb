#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # isbnproc
//!
//! isbnproc turns a photo of a printed ISBN into a book record. The text the OCR service read
//! from the image is reduced to its digits, looked up in the Google Books catalog and normalized
//! into a [`BookRecord`] that is handed to a persistence service.
//!
//! The OCR and persistence services are reached through the [`TextDetector`] and
//! [`RecordStore`] traits; [`Pipeline`] sequences one upload through all of the steps.

mod catalog;
mod error;
mod event;
mod extract;
mod normalize;
mod pipeline;
mod record;

pub use catalog::{
    google_books::{CatalogEnvelope, IndustryIdentifier, Volume, VolumeInfo, VolumeSearch, NO_STATUS},
    Client,
};
pub use error::{Error, ErrorKind};
pub use event::UploadEvent;
pub use extract::extract;
pub use normalize::{is_isbn_shaped, normalize};
pub use pipeline::{GlobalLogger, Pipeline, RecordStore, TextDetector};
pub use record::{BookDetails, BookRecord, NO_PUBLISHER};

use log::trace;

type DefaultClient = reqwest::blocking::Client;

/// Looks up `isbn` in the Google Books catalog using the default HTTP client.
///
/// Exactly one request is made. A failed exchange is reported as [`CatalogEnvelope::Error`]
/// rather than an `Err`, so callers decide whether it is fatal.
#[inline]
#[must_use]
pub fn lookup(isbn: &str) -> CatalogEnvelope {
    trace!("Look up catalog entry for ISBN '{isbn}'");
    catalog::google_books::lookup::<DefaultClient>(isbn)
}
