//! Error types for the synchronization engine.

use reqwest::StatusCode;

/// Failure raised by [`crate::spotify::transport::Transport`] once its retry
/// policy is exhausted, or immediately for statuses that are not retried.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Rate limit exceeded after repeated retries: {body}")]
    RateLimitExceeded { body: String },

    #[error("Server error ({status}) after repeated retries: {body}")]
    ServerError { status: StatusCode, body: String },

    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: StatusCode, body: String },

    #[error("Failed to send http request: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request body cannot be replayed for a retry")]
    NotReplayable,
}

impl TransportError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TransportError::RateLimitExceeded { .. } => Some(StatusCode::TOO_MANY_REQUESTS),
            TransportError::ServerError { status, .. }
            | TransportError::RequestFailed { status, .. } => Some(*status),
            TransportError::Network(e) => e.status(),
            TransportError::NotReplayable => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not logged in. Run `spotlist auth` first.")]
    AuthRequired,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A batch failed after `committed` tracks (at least one batch) were
    /// already added. The playlist keeps those tracks.
    #[error("Adding tracks failed after {committed} track(s) were committed: {source}")]
    PartialCommit {
        committed: usize,
        #[source]
        source: TransportError,
    },

    #[error("Another import or export is already running in this session")]
    Busy,

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Token storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
