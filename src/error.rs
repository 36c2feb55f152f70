//! Errors recorded against a single transfer.
//!
//! A `TransferError` never crosses a task boundary as a `Result`: the
//! downloader stores it in the transfer's counter and the coordinator
//! reads it back from there.
use thiserror::Error;

/// Broad classification of a [`TransferError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RequestConstruction,
    Network,
    FileSystem,
    Cancellation,
}

/// Terminal error of a single transfer.
///
/// Messages are captured as strings so the error can be cloned into
/// snapshots that outlive the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("invalid request: {0}")]
    RequestConstruction(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("server responded with {0}")]
    HttpStatus(u16),

    #[error("received {received} of {expected} bytes")]
    Incomplete { expected: u64, received: u64 },

    #[error("{path}: {message}")]
    FileSystem { path: String, message: String },

    #[error("destination already claimed by {0}")]
    DestinationConflict(String),

    #[error("interrupted")]
    Cancelled,
}

impl TransferError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RequestConstruction(_) => ErrorKind::RequestConstruction,
            Self::Network(_) | Self::HttpStatus(_) | Self::Incomplete { .. } => ErrorKind::Network,
            Self::FileSystem { .. } | Self::DestinationConflict(_) => ErrorKind::FileSystem,
            Self::Cancelled => ErrorKind::Cancellation,
        }
    }

    pub(crate) fn file_system(path: &str, err: &std::io::Error) -> Self {
        Self::FileSystem {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for TransferError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::RequestConstruction(err.to_string())
        } else if let Some(status) = err.status() {
            Self::HttpStatus(status.as_u16())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_group_variants() {
        assert_eq!(TransferError::HttpStatus(404).kind(), ErrorKind::Network);
        assert_eq!(
            TransferError::Incomplete {
                expected: 10,
                received: 4
            }
            .kind(),
            ErrorKind::Network
        );
        assert_eq!(
            TransferError::DestinationConflict("http://a/x".into()).kind(),
            ErrorKind::FileSystem
        );
        assert_eq!(TransferError::Cancelled.kind(), ErrorKind::Cancellation);
    }

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(
            TransferError::HttpStatus(404).to_string(),
            "server responded with 404"
        );
        assert_eq!(
            TransferError::FileSystem {
                path: "a.bin".into(),
                message: "permission denied".into()
            }
            .to_string(),
            "a.bin: permission denied"
        );
    }
}
