use log::{debug, trace};

use crate::{
    catalog::google_books::{CatalogEnvelope, VolumeInfo, VolumeSearch},
    record::{BookDetails, BookRecord, NO_PUBLISHER},
    Error, ErrorKind,
};

/// Shapes a catalog lookup into the record that gets persisted.
///
/// When the catalog found the book, the first volume it returned becomes a matched record. Its
/// identifiers are sorted by type and the second one is used as the ISBN, which picks `ISBN_13`
/// over `ISBN_10` when both are present. Any other outcome, an error envelope included, produces
/// an unmatched record for `isbn`.
///
/// # Errors
///
/// An [`ErrorKind::InvalidIsbnFormat`] error, carrying `isbn`, when there was no match and `isbn`
/// is not 10 or 13 decimal digits.
/// An [`ErrorKind::Deserialize`] error when the matched volume's published date does not start
/// with a year.
pub fn normalize(envelope: CatalogEnvelope, isbn: &str) -> Result<BookRecord, Error> {
    match envelope {
        CatalogEnvelope::Success(VolumeSearch { total_items, items }) if total_items != 0 => {
            if let Some(volume) = items.into_iter().next() {
                return matched(volume.volume_info, isbn);
            }
            debug!("Catalog reported {total_items} matches for '{isbn}' but sent no items");
        }
        CatalogEnvelope::Success(_) => trace!("No catalog match for '{isbn}'"),
        CatalogEnvelope::Error { code, reason } => {
            debug!("Normalizing '{isbn}' after a failed lookup ({code}: {reason})");
        }
    }

    unmatched(isbn)
}

/// Returns true when `isbn` is exactly 10 or 13 decimal digits.
///
/// No checksum is verified.
#[must_use]
pub fn is_isbn_shaped(isbn: &str) -> bool {
    matches!(isbn.len(), 10 | 13) && isbn.bytes().all(|b| b.is_ascii_digit())
}

fn unmatched(isbn: &str) -> Result<BookRecord, Error> {
    if is_isbn_shaped(isbn) {
        Ok(BookRecord::unmatched(isbn))
    } else {
        Err(Error::new(ErrorKind::InvalidIsbnFormat, isbn))
    }
}

fn matched(info: VolumeInfo, isbn: &str) -> Result<BookRecord, Error> {
    // Deconstruct to take ownership of fields (avoids cloning).
    let VolumeInfo {
        mut industry_identifiers,
        title,
        subtitle,
        authors,
        categories,
        page_count,
        language,
        publisher,
        published_date,
    } = info;

    // ISBN_10 < ISBN_13 < ISSN < OTHER
    industry_identifiers.sort_by(|a, b| a.kind.cmp(&b.kind));
    let canonical = industry_identifiers
        .get(1)
        .or_else(|| {
            industry_identifiers
                .first()
                .filter(|id| id.kind.starts_with("ISBN_"))
        })
        .map_or_else(|| isbn.to_owned(), |id| id.identifier.clone());

    let title = match subtitle.filter(|s| !s.is_empty()) {
        Some(subtitle) => format!("{title}: {subtitle}"),
        None => title,
    };

    let details = BookDetails {
        authors,
        title,
        categories,
        page_count: page_count.unwrap_or(0),
        language: language.to_uppercase(),
        publisher: publisher.unwrap_or_else(|| NO_PUBLISHER.to_owned()),
        published_year: published_year(published_date.as_deref())?,
    };

    Ok(BookRecord::matched(canonical, details))
}

fn published_year(date: Option<&str>) -> Result<u16, Error> {
    let Some(date) = date else {
        return Ok(0);
    };

    let year: String = date.chars().take(4).collect();
    year.parse().map_err(|_| {
        Error::new(
            ErrorKind::Deserialize,
            format!("Published date '{date}' does not start with a year"),
        )
    })
}
