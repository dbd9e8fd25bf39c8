use std::time::Duration;
use thiserror::Error;

// * Unified Error type for the Network Layer.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Too many redirects (limit {0})")]
    TooManyRedirects(usize),

    #[error("Unusable Location header: {0}")]
    InvalidLocation(String),
}

impl ProbeError {
    // * Splits timeouts out of the transport error so callers can tell a hang from a refusal.
    pub(crate) fn from_send(err: reqwest::Error, url: &str, timeout: Duration) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout {
                url: url.to_string(),
                timeout,
            }
        } else {
            ProbeError::Network(err)
        }
    }
}
