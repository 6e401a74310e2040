use std::time::Duration;

use thiserror::Error;

/// Failure reported by an injected transport.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The byte fetcher the embedding application injects.
///
/// The engine decides *whether and where* to fetch; it never performs the
/// fetch itself. Implementations should honor `timeout` as a hard bound on
/// the whole request.
pub trait Transport {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String, TransportError>;
}
