use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cluster responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Credentials error: {0}")]
    Credentials(String),
}

impl SnapshotError {
    /// Whether the connect loop should try again after this error.
    ///
    /// Transport failures and gateway/timeout statuses are transient; anything
    /// else (bad credentials, malformed responses) will not fix itself.
    pub fn is_retryable(&self) -> bool {
        match self {
            SnapshotError::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            SnapshotError::Status { status, .. } => matches!(status, 408 | 502 | 503 | 504),
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SnapshotError::Status { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, SnapshotError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> SnapshotError {
        SnapshotError::Status {
            status: code,
            body: String::new(),
        }
    }

    #[test]
    fn test_transient_statuses_are_retryable() {
        for code in [408, 502, 503, 504] {
            assert!(status(code).is_retryable(), "{} should be retryable", code);
        }
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        for code in [400, 401, 403, 404, 500] {
            assert!(!status(code).is_retryable(), "{} should not be retryable", code);
        }
        assert!(!SnapshotError::Config("x".into()).is_retryable());
    }

    #[test]
    fn test_not_found() {
        assert!(status(404).is_not_found());
        assert!(!status(403).is_not_found());
    }

    #[test]
    fn test_status_display_includes_body() {
        let err = SnapshotError::Status {
            status: 404,
            body: r#"{"error":"index_not_found_exception"}"#.into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("index_not_found_exception"));
    }
}
