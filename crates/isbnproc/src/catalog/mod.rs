use serde::de::DeserializeOwned;

pub(crate) mod google_books;

/// The HTTP transport used by the catalog lookup.
///
/// Implementors perform exactly one request per call and never retry.
pub trait Client
where
    Self: Default,
{
    /// Sends a GET request to `url` and decodes the JSON body of a successful response.
    ///
    /// # Errors
    ///
    /// An [`ErrorKind::IO`] error when the request could not be sent or no response arrived.
    /// An [`ErrorKind::Status`] error, carrying the status code, for a non-success response.
    /// An [`ErrorKind::Deserialize`] error when the body is not the expected JSON.
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned;
}

impl Client for reqwest::blocking::Client {
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let resp = self
            .get(url)
            .send()
            .map_err(|e| Error::wrap(ErrorKind::IO, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown status"),
            ));
        }

        resp.json()
            .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
    }
}

#[cfg(test)]
pub(crate) use test::{
    assert_url, impl_text_producer, MockClient, NetworkErrorProducer, NotFoundProducer, Producer,
    URL_SINK,
};

use crate::{Error, ErrorKind};
