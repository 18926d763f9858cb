//! Sequencing one upload through OCR, extraction, lookup, normalization and persistence.

use std::{fmt, marker::PhantomData};

use log::{Level, Log, Metadata, Record};

use crate::{
    catalog::{
        google_books::{self, CatalogEnvelope},
        Client,
    },
    event::UploadEvent,
    extract::extract,
    normalize::normalize,
    record::BookRecord,
    Error, ErrorKind,
};

/// The OCR service.
pub trait TextDetector {
    /// Detects the text lines in the image stored at `bucket`/`key`, in reading order.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the image could not be analyzed.
    fn detect_text(&self, bucket: &str, key: &str) -> Result<Vec<String>, Error>;
}

/// The key-value persistence service.
pub trait RecordStore {
    /// Writes `record` into `table`, keyed by its ISBN and timestamp.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the write was rejected.
    fn put(&self, table: &str, record: &BookRecord) -> Result<(), Error>;
}

/// A [`Log`] that forwards to whichever logger is installed for the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalLogger;

impl Log for GlobalLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level() && log::logger().enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if record.level() <= log::max_level() {
            log::logger().log(record);
        }
    }

    fn flush(&self) {
        log::logger().flush();
    }
}

/// Processes upload events one at a time.
///
/// A pipeline keeps no state between runs, so the same value can handle any number of events,
/// from several threads when its collaborators allow it.
pub struct Pipeline<D, S, L = GlobalLogger, C = reqwest::blocking::Client> {
    detector: D,
    store: S,
    table: String,
    logger: L,
    _client: PhantomData<fn() -> C>,
}

impl<D, S> Pipeline<D, S>
where
    D: TextDetector,
    S: RecordStore,
{
    /// Creates a pipeline that writes records into `table` and logs through the global logger.
    #[must_use]
    pub fn new<T: Into<String>>(detector: D, store: S, table: T) -> Self {
        Self {
            detector,
            store,
            table: table.into(),
            logger: GlobalLogger,
            _client: PhantomData,
        }
    }
}

impl<D, S, L, C> Pipeline<D, S, L, C> {
    /// Replaces the sink run outcomes are logged to.
    #[must_use]
    pub fn with_logger<L2: Log>(self, logger: L2) -> Pipeline<D, S, L2, C> {
        Pipeline {
            detector: self.detector,
            store: self.store,
            table: self.table,
            logger,
            _client: PhantomData,
        }
    }

    /// Replaces the HTTP client used for catalog lookups.
    #[must_use]
    pub fn with_client<C2: Client>(self) -> Pipeline<D, S, L, C2> {
        Pipeline {
            detector: self.detector,
            store: self.store,
            table: self.table,
            logger: self.logger,
            _client: PhantomData,
        }
    }

    /// The table records are written into.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The sink run outcomes are logged to.
    #[must_use]
    pub const fn logger(&self) -> &L {
        &self.logger
    }

    /// The persistence collaborator.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<D, S, L, C> Pipeline<D, S, L, C>
where
    D: TextDetector,
    S: RecordStore,
    L: Log,
    C: Client,
{
    /// Processes `event` and logs the outcome.
    ///
    /// Every failure stops here: it is logged with enough context to diagnose it and nothing is
    /// persisted.
    pub fn handle(&self, event: &UploadEvent) {
        match self.run(event) {
            Ok(record) => self.log(
                Level::Info,
                format_args!(
                    "Record for ISBN '{}' loaded into table '{}'",
                    record.isbn(),
                    self.table
                ),
            ),
            Err(err) => self.log(
                Level::Error,
                format_args!(
                    "Processing s3://{}/{} failed: {err}",
                    event.bucket_name, event.object_key
                ),
            ),
        }
    }

    /// Processes `event` and returns the record that was persisted.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::NoTextDetected`] error when OCR found no text in the image.
    /// An [`ErrorKind::CatalogTransport`] error when the catalog lookup failed.
    /// An [`ErrorKind::InvalidIsbnFormat`] error when the catalog had no match and the digits
    /// read from the image are not an ISBN.
    /// An [`ErrorKind::PersistenceWrite`] error when the store rejected the record.
    /// An [`ErrorKind::Unexpected`] error for any other failure.
    pub fn run(&self, event: &UploadEvent) -> Result<BookRecord, Error> {
        let UploadEvent {
            bucket_name,
            object_key,
            event_time,
        } = event;

        let lines = self
            .detector
            .detect_text(bucket_name, object_key)
            .map_err(|e| unexpected(e, "Could not analyze image"))?;

        let raw = lines.into_iter().next().ok_or_else(|| {
            Error::new(
                ErrorKind::NoTextDetected,
                format!("No text lines in s3://{bucket_name}/{object_key}"),
            )
        })?;
        self.log(Level::Debug, format_args!("First detected line: '{raw}'"));

        let isbn = extract(&raw);

        let envelope = google_books::lookup::<C>(&isbn);
        if let CatalogEnvelope::Error { code, reason } = &envelope {
            return Err(Error::new(
                ErrorKind::CatalogTransport,
                format!("Lookup of ISBN '{isbn}' failed with {code}: {reason}"),
            ));
        }

        let record = normalize(envelope, &isbn)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidIsbnFormat => e,
                _ => unexpected(e, "Could not normalize catalog response"),
            })?
            .with_timestamp(event_time);

        self.log(Level::Info, format_args!("Parsed data: {record:?}"));

        self.store.put(&self.table, &record).map_err(|e| {
            Error::wrap(ErrorKind::PersistenceWrite, e).with_message(format!(
                "Could not load {record:?} into table '{}'",
                self.table
            ))
        })?;

        Ok(record)
    }

    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        self.logger.log(
            &Record::builder()
                .args(args)
                .level(level)
                .target(module_path!())
                .module_path_static(Some(module_path!()))
                .build(),
        );
    }
}

fn unexpected(err: Error, context: &str) -> Error {
    Error::wrap(ErrorKind::Unexpected, err).with_message(context)
}
