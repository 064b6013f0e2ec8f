//! Error types shared across the s3ctl crates.

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by credential handling, storage calls and admin calls.
///
/// Every remote operation maps into exactly one variant; the CLI layer
/// turns the variant into a printed line and an exit code, nothing else.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error while reading or writing local files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Credentials or configuration file trouble that must be reported
    #[error("config error: {0}")]
    Config(String),

    /// Transport-level failure: connect, dispatch, timeout
    #[error("network error: {0}")]
    Network(String),

    /// Admin call answered with a non-success HTTP status
    #[error("admin request failed {status} with: {body}")]
    AdminStatus { status: u16, body: String },

    /// Remote entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed command-line value detected before any remote call
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Anything else
    #[error("{0}")]
    General(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_status_display() {
        let e = Error::AdminStatus {
            status: 403,
            body: "token mismatch".to_string(),
        };
        assert_eq!(e.to_string(), "admin request failed 403 with: token mismatch");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e: Error = io.into();
        assert!(matches!(e, Error::Io(_)));
    }
}
