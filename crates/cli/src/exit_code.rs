//! Process exit codes.
//!
//! Every command maps its outcome to one of these; failures always exit
//! non-zero, admin-channel failures always exit 1.

use sctl_core::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    UsageError = 2,
    NetworkError = 3,
    NotFound = 5,
}

impl ExitCode {
    /// Map a storage-path error to an exit code.
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::NotFound(_) => Self::NotFound,
            Error::Network(_) => Self::NetworkError,
            Error::InvalidArgument(_) => Self::UsageError,
            _ => Self::GeneralError,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::GeneralError.code(), 1);
        assert_eq!(ExitCode::UsageError.code(), 2);
        assert_eq!(ExitCode::NetworkError.code(), 3);
        assert_eq!(ExitCode::NotFound.code(), 5);
    }

    #[test]
    fn test_from_error() {
        assert_eq!(
            ExitCode::from_error(&Error::NotFound("x".into())),
            ExitCode::NotFound
        );
        assert_eq!(
            ExitCode::from_error(&Error::Network("x".into())),
            ExitCode::NetworkError
        );
        assert_eq!(
            ExitCode::from_error(&Error::InvalidArgument("x".into())),
            ExitCode::UsageError
        );
        assert_eq!(
            ExitCode::from_error(&Error::General("x".into())),
            ExitCode::GeneralError
        );
    }
}
