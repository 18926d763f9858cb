use serde::ser::{Serialize, SerializeMap, Serializer};

/// Publisher recorded when the catalog does not name one.
pub const NO_PUBLISHER: &str = "N/A";

/// The normalized, persistence ready record for one processed upload.
///
/// A record is either *matched*, carrying every field of [`BookDetails`], or *unmatched*, carrying
/// only the ISBN. The `exception` flag written to storage is derived from which of the two it is,
/// so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    isbn: String,
    details: Option<BookDetails>,
    timestamp: Option<String>,
}

/// Catalog metadata of a matched book, with defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookDetails {
    /// Authors in catalog order.
    pub authors: Vec<String>,
    /// Title, with the subtitle appended after `": "` when there is one.
    pub title: String,
    /// Subject categories.
    pub categories: Vec<String>,
    /// Page count, `0` when unknown.
    pub page_count: u32,
    /// Upper-cased language code.
    pub language: String,
    /// Publisher, [`NO_PUBLISHER`] when unknown.
    pub publisher: String,
    /// Year of publication, `0` when unknown.
    pub published_year: u16,
}

impl BookRecord {
    /// A record for a book the catalog knows about.
    #[must_use]
    pub fn matched<S: Into<String>>(isbn: S, details: BookDetails) -> Self {
        Self {
            isbn: isbn.into(),
            details: Some(details),
            timestamp: None,
        }
    }

    /// A record for an ISBN the catalog had no match for.
    #[must_use]
    pub fn unmatched<S: Into<String>>(isbn: S) -> Self {
        Self {
            isbn: isbn.into(),
            details: None,
            timestamp: None,
        }
    }

    /// Sets the timestamp used as the sort key in storage.
    #[must_use]
    pub fn with_timestamp<S: Into<String>>(mut self, timestamp: S) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// The ISBN the record is keyed by.
    #[must_use]
    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    /// `0` for a matched record, `1` when the catalog had no match.
    #[must_use]
    pub const fn exception(&self) -> u8 {
        if self.details.is_some() {
            0
        } else {
            1
        }
    }

    /// Catalog metadata, present only on matched records.
    #[must_use]
    pub const fn details(&self) -> Option<&BookDetails> {
        self.details.as_ref()
    }

    /// The attached timestamp, if any.
    #[must_use]
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }
}

impl Serialize for BookRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("isbn", &self.isbn)?;
        map.serialize_entry("exception", &self.exception())?;

        if let Some(details) = &self.details {
            map.serialize_entry("authors", &details.authors)?;
            map.serialize_entry("title", &details.title)?;
            map.serialize_entry("categories", &details.categories)?;
            map.serialize_entry("page_count", &details.page_count)?;
            map.serialize_entry("language", &details.language)?;
            map.serialize_entry("publisher", &details.publisher)?;
            map.serialize_entry("published_year", &details.published_year)?;
        }

        if let Some(timestamp) = &self.timestamp {
            map.serialize_entry("timestamp", timestamp)?;
        }

        map.end()
    }
}
