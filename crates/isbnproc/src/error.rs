pub(crate) type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The Errors that may occur when processing an uploaded ISBN image.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<DynError>,
    status: Option<u16>,
}

/// Types of errors that make up an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The error is associated with an underlying IO or network error.
    IO,
    /// A remote service answered with a non-success HTTP status.
    Status,
    /// An error caused when parsing/deserialization fails.
    Deserialize,
    /// An error when an operation has failed to return a value.
    NoValue,
    /// The catalog lookup came back as an error envelope.
    CatalogTransport,
    /// A candidate ISBN is not 10 or 13 decimal digits.
    InvalidIsbnFormat,
    /// The OCR service did not detect any text in the image.
    NoTextDetected,
    /// The persistence service rejected a record.
    PersistenceWrite,
    /// Anything not covered by the other kinds.
    Unexpected,
}

impl Error {
    /// Creates a new [`Error`] based on the [`ErrorKind`] and message to describe the error.
    #[must_use]
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            source: None,
            status: None,
        }
    }

    /// Wraps an existing error as the source of [`Error`].
    #[must_use]
    pub fn wrap<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
            status: None,
        }
    }

    /// Creates an [`ErrorKind::Status`] error for an HTTP status code and its reason phrase.
    #[must_use]
    pub fn status<S: Into<String>>(code: u16, reason: S) -> Self {
        Self {
            status: Some(code),
            ..Self::new(ErrorKind::Status, reason)
        }
    }

    /// Attaches a message to an [`Error`], keeping any source it already carries.
    #[must_use]
    pub fn with_message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the kind of error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the HTTP status code of the remote response, when there was one.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        self.status
    }

    /// A human readable reason for the error, taken from the message or else the source.
    #[must_use]
    pub fn reason(&self) -> String {
        match (&self.message, &self.source) {
            (Some(message), _) => message.clone(),
            (None, Some(source)) => source.to_string(),
            (None, None) => self.kind.to_string(),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::IO => "IO error",
            Self::Status => "HTTP status error",
            Self::Deserialize => "Deserialize error",
            Self::NoValue => "No value error",
            Self::CatalogTransport => "Catalog transport error",
            Self::InvalidIsbnFormat => "Invalid ISBN format",
            Self::NoTextDetected => "No text detected",
            Self::PersistenceWrite => "Persistence write error",
            Self::Unexpected => "Unexpected error",
        })
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(status) = self.status {
            write!(f, " ({status})")?;
        }

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(cause) = &self.source {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| &**e as _)
    }
}
