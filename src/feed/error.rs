use thiserror::Error;

/// Why a poll of the alert feed produced nothing usable.
///
/// Always recoverable: the poll loop logs it and skips the cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("feed returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err)
        } else {
            FetchError::Http(err)
        }
    }
}
