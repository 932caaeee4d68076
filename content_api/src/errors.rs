//! Error types for the content API client.

/// Errors that can occur when talking to the content API.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request could not be sent or the body could not be read.
    #[error("Request failed")]
    RequestFailed,
    /// The request did not complete before its deadline.
    #[error("Request timed out")]
    Timeout,
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The body was not the JSON shape we expected.
    #[error("Failed to parse response: {0}")]
    Parse(String),
    /// The base URL and path did not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// True when the upstream answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::HttpStatus { status: 404, .. })
    }
}
