use log::{info, trace, warn};
use serde::Deserialize;

use super::Client;

const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes?q=isbn:";

/// Status code used in [`CatalogEnvelope::Error`] when no HTTP status could be obtained.
pub const NO_STATUS: i32 = -1;

/// The outcome of a single catalog lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEnvelope {
    /// The catalog answered and its body was decoded.
    Success(VolumeSearch),
    /// The exchange failed at the transport or protocol level.
    Error {
        /// The remote HTTP status, or [`NO_STATUS`] when there was none.
        code: i32,
        /// Human readable cause of the failure.
        reason: String,
    },
}

/// Body of a successful `volumes` search.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSearch {
    /// Number of volumes matching the query.
    pub total_items: u32,
    /// The matching volumes, in the order the catalog ranked them.
    #[serde(default)]
    pub items: Vec<Volume>,
}

/// One entry in [`VolumeSearch::items`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// The bibliographic data of the volume.
    pub volume_info: VolumeInfo,
}

/// Volume information from the Google Books API.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    /// ISBN-10, ISBN-13 and other identifiers of the volume.
    #[serde(default)]
    pub industry_identifiers: Vec<IndustryIdentifier>,
    /// Main title.
    #[serde(default)]
    pub title: String,
    /// Subtitle, when the catalog has one.
    pub subtitle: Option<String>,
    /// Authors in catalog order.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Subject categories.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Printed page count.
    pub page_count: Option<u32>,
    /// Two letter language code.
    #[serde(default)]
    pub language: String,
    /// Publisher name.
    pub publisher: Option<String>,
    /// Year prefixed date, e.g. `2004` or `2011-03-20`.
    pub published_date: Option<String>,
}

/// A `{type, identifier}` pair such as `ISBN_13` / `9780735619678`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndustryIdentifier {
    /// Identifier type, e.g. `ISBN_10`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The identifier itself.
    pub identifier: String,
}

impl IndustryIdentifier {
    /// Creates an identifier pair.
    #[must_use]
    pub fn new<K: Into<String>, I: Into<String>>(kind: K, identifier: I) -> Self {
        Self {
            kind: kind.into(),
            identifier: identifier.into(),
        }
    }
}

pub(crate) fn lookup<C: Client>(isbn: &str) -> CatalogEnvelope {
    info!("Searching for ISBN '{isbn}' using Google Books API");
    let mut url = GOOGLE_BOOKS_URL.to_owned();
    url.push_str(isbn);

    let client = C::default();
    match client.get_json::<VolumeSearch>(&url) {
        Ok(search) => {
            trace!("Request was successful - {} matches", search.total_items);
            CatalogEnvelope::Success(search)
        }
        Err(err) => {
            warn!("Catalog lookup for '{isbn}' failed: {err}");
            CatalogEnvelope::Error {
                code: err.status_code().map_or(NO_STATUS, i32::from),
                reason: err.reason(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogEnvelope, IndustryIdentifier, VolumeSearch, NO_STATUS};
    use crate::catalog::{
        assert_url, impl_text_producer, MockClient, NetworkErrorProducer, NotFoundProducer,
    };

    const GOOGLE_BOOK_JSON: &str = include_str!("../../tests/data/google_book_json.txt");

    impl_text_producer! {
        ValidJsonProducer => Ok(GOOGLE_BOOK_JSON.to_owned()),
        GarbledJsonProducer => Ok("<html>Service Unavailable</html>".to_owned()),
        UntitledItemProducer => Ok(
            r#"{
                "totalItems": 2,
                "items": [
                    { "volumeInfo": { "title": "Code Complete", "language": "en" } },
                    { "volumeInfo": { "language": "en" } }
                ]
            }"#.to_owned()
        ),
    }

    #[test]
    fn isbn_is_the_only_query_term() {
        super::lookup::<MockClient<ValidJsonProducer>>("0735619670");
        assert_url!("https://www.googleapis.com/books/v1/volumes?q=isbn:0735619670");
    }

    #[test]
    fn valid_json_produces_success_envelope() {
        let envelope = super::lookup::<MockClient<ValidJsonProducer>>("0735619670");

        let search = match envelope {
            CatalogEnvelope::Success(search) => search,
            other => panic!("Expected a success envelope, got {other:?}"),
        };

        assert_eq!(1, search.total_items);
        let info = &search.items[0].volume_info;
        assert_eq!("Code Complete", info.title);
        assert_eq!(None, info.subtitle);
        assert_eq!(vec!["Steve McConnell".to_owned()], info.authors);
        assert_eq!(Some(914), info.page_count);
        assert_eq!(Some("2004"), info.published_date.as_deref());
        // identifiers keep the catalog's own order
        assert_eq!(
            vec![
                IndustryIdentifier::new("ISBN_13", "9780735619678"),
                IndustryIdentifier::new("ISBN_10", "0735619670"),
            ],
            info.industry_identifiers
        );
    }

    #[test]
    fn untitled_item_still_decodes_as_success() {
        let envelope = super::lookup::<MockClient<UntitledItemProducer>>("0735619670");

        let search = match envelope {
            CatalogEnvelope::Success(search) => search,
            other => panic!("Expected a success envelope, got {other:?}"),
        };

        assert_eq!(2, search.items.len());
        assert_eq!("Code Complete", search.items[0].volume_info.title);
        assert_eq!("", search.items[1].volume_info.title);
    }

    #[test]
    fn zero_matches_has_no_items() {
        let envelope = super::lookup::<MockClient>("9780134685991");
        assert_eq!(
            CatalogEnvelope::Success(VolumeSearch {
                total_items: 0,
                items: vec![],
            }),
            envelope
        );
    }

    #[test]
    fn http_error_keeps_status_and_reason() {
        let envelope = super::lookup::<MockClient<NotFoundProducer>>("9789876290500");
        assert_eq!(
            CatalogEnvelope::Error {
                code: 404,
                reason: "Not Found".to_owned(),
            },
            envelope
        );
    }

    #[test]
    fn network_error_has_no_status() {
        let envelope = super::lookup::<MockClient<NetworkErrorProducer>>("9789876290500");
        assert_eq!(
            CatalogEnvelope::Error {
                code: NO_STATUS,
                reason: "Connection failed".to_owned(),
            },
            envelope
        );
    }

    #[test]
    fn undecodable_body_is_an_error_without_status() {
        let envelope = super::lookup::<MockClient<GarbledJsonProducer>>("9789876290500");
        assert!(
            matches!(envelope, CatalogEnvelope::Error { code: NO_STATUS, .. }),
            "{envelope:?}"
        );
    }
}
