use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    NotInitialized,
    InvalidCamera(u64),
    EmptyCredential,
    /// Transport or HTTP status failure, recoverable by re-triggering the operation.
    Request(String),
    Attach(String),
    Seek(String),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::NotInitialized => write!(f, "no camera is open"),
            PlaybackError::InvalidCamera(id) => write!(f, "invalid camera id: {id}"),
            PlaybackError::EmptyCredential => write!(f, "access token is empty"),
            PlaybackError::Request(msg) => write!(f, "{msg}"),
            PlaybackError::Attach(msg) => write!(f, "media pipeline error: {msg}"),
            PlaybackError::Seek(msg) => write!(f, "seek failed: {msg}"),
        }
    }
}

impl std::error::Error for PlaybackError {}
