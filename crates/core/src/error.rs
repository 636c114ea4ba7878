use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating, browsing or saving from a media server
///
/// `Discovery` and `Protocol` abort a run. The remaining variants are
/// reported per item by the recorder and never stop a batch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("discovery failed: {0}")]
    Discovery(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("already writing (lock file exists): {}", .0.display())]
    DownloadConflict(PathBuf),

    #[error("currently recording: {0}")]
    RecordingInProgress(String),

    #[error("transfer failed: {0}")]
    Transfer(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// True for errors that end the whole run rather than a single item
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FetchError::Discovery(_)
                | FetchError::Protocol(_)
                | FetchError::Ledger(_)
                | FetchError::Config(_)
        )
    }
}

pub type Result<T, E = FetchError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_fatal_classification() {
        assert!(FetchError::Discovery("no route".into()).is_fatal());
        assert!(FetchError::Protocol("bad xml".into()).is_fatal());
        assert!(FetchError::Config("bad toml".into()).is_fatal());

        assert!(!FetchError::DownloadConflict(PathBuf::from("a.mpeg.lock")).is_fatal());
        assert!(!FetchError::RecordingInProgress("S1 E1".into()).is_fatal());
        assert!(!FetchError::Transfer("reset".into()).is_fatal());
        assert!(!FetchError::Io(std::io::Error::other("disk full")).is_fatal());
    }

    #[test]
    fn test_ledger_error_from_json() {
        let err: FetchError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, FetchError::Ledger(_)));
        assert!(err.is_fatal());
    }
}
