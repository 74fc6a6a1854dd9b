//! Transport seam
//!
//! The browser never opens sockets itself. A host hands the client something
//! that can POST a JSON body and return the status and body it got back.

use thiserror::Error;

/// Raw reply to a POST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpReply {
    /// Creates a reply
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossily decoded
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Failures below the HTTP layer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out")]
    Timeout,
}

/// Something that can POST a JSON body to a URL
pub trait Transport {
    fn post(&self, url: &str, body: &[u8]) -> Result<HttpReply, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, url: &str, body: &[u8]) -> Result<HttpReply, TransportError> {
        (**self).post(url, body)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn post(&self, url: &str, body: &[u8]) -> Result<HttpReply, TransportError> {
        (**self).post(url, body)
    }
}
