use serde::Deserialize;

use crate::{Error, ErrorKind};

/// An object upload delivered by the storage trigger.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadEvent {
    /// Bucket holding the uploaded image.
    pub bucket_name: String,
    /// Key of the uploaded image inside the bucket.
    pub object_key: String,
    /// When the upload happened, as reported by the trigger.
    pub event_time: String,
}

impl UploadEvent {
    /// Creates an event for an upload of `object_key` into `bucket_name`.
    #[must_use]
    pub fn new<B, K, T>(bucket_name: B, object_key: K, event_time: T) -> Self
    where
        B: Into<String>,
        K: Into<String>,
        T: Into<String>,
    {
        Self {
            bucket_name: bucket_name.into(),
            object_key: object_key.into(),
            event_time: event_time.into(),
        }
    }

    /// Decodes the first record of an S3 style object-created notification.
    ///
    /// ```
    /// let json = r#"{"Records": [{
    ///     "eventTime": "2025-01-01T00:00:00.000Z",
    ///     "s3": {"bucket": {"name": "images"}, "object": {"key": "cover.jpg"}}
    /// }]}"#;
    ///
    /// let event = isbnproc::UploadEvent::from_notification(json).unwrap();
    /// assert_eq!("images", event.bucket_name);
    /// assert_eq!("cover.jpg", event.object_key);
    /// ```
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::Deserialize`] error when `json` is not a notification document.
    /// An [`ErrorKind::NoValue`] error when the notification has no records.
    pub fn from_notification(json: &str) -> Result<Self, Error> {
        let Notification { records } =
            serde_json::from_str(json).map_err(|e| Error::wrap(ErrorKind::Deserialize, e))?;

        records
            .into_iter()
            .next()
            .map(NotificationRecord::into_event)
            .ok_or_else(|| Error::new(ErrorKind::NoValue, "Notification contains no records"))
    }
}

#[derive(Deserialize)]
struct Notification {
    #[serde(rename = "Records")]
    records: Vec<NotificationRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationRecord {
    event_time: String,
    s3: S3Entity,
}

#[derive(Deserialize)]
struct S3Entity {
    bucket: Named,
    object: Keyed,
}

#[derive(Deserialize)]
struct Named {
    name: String,
}

#[derive(Deserialize)]
struct Keyed {
    key: String,
}

impl NotificationRecord {
    fn into_event(self) -> UploadEvent {
        let Self {
            event_time,
            s3:
                S3Entity {
                    bucket: Named { name },
                    object: Keyed { key },
                },
        } = self;

        UploadEvent::new(name, key, event_time)
    }
}
