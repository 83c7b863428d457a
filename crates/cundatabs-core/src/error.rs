//! Error types for `cundatabs-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`. Rate limiting never fails
//! and has no variant here; a denied request is a normal outcome.

use std::path::PathBuf;

/// Unified error type for all core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested tablature file does not exist.
    #[error("tablature not found: {0}")]
    NotFound(PathBuf),

    /// A tablature name is unusable as a file name (empty, contains path
    /// separators, `..`, etc.).
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// A tablature could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `cundatabs-core`.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_displays_path() {
        let err = CoreError::NotFound(PathBuf::from("tablaturas/missing.json"));
        assert_eq!(err.to_string(), "tablature not found: tablaturas/missing.json");
    }

    #[test]
    fn invalid_name_displays_message() {
        let err = CoreError::InvalidName("../etc/passwd".to_string());
        assert_eq!(err.to_string(), "invalid name: ../etc/passwd");
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked");
        let core_err: CoreError = io_err.into();
        assert!(matches!(core_err, CoreError::Io(_)));
        assert!(core_err.to_string().contains("locked"));
    }

    #[test]
    fn serde_error_converts() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let core_err: CoreError = json_err.into();
        assert!(matches!(core_err, CoreError::Serialize(_)));
    }
}
