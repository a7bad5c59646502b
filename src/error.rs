use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors surfaced by commands, the session loader and the binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid path provided by the user or the host.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The destination of a create, rename or move already exists.
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    /// A folder was dropped onto itself or into one of its descendants.
    #[error("Cannot move {} into {}", from.display(), into.display())]
    InvalidMove { from: PathBuf, into: PathBuf },

    /// The command does not apply to the current selection.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// The session file could not be parsed.
    #[error("Session error: {0}")]
    Session(#[from] serde_json::Error),

    /// The file watcher could not be started.
    #[error("Watcher error: {0}")]
    Watcher(#[from] notify::Error),

    /// The event loop channel closed unexpectedly.
    #[error("Event channel closed")]
    ChannelClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn test_already_exists_display() {
        let err = AppError::AlreadyExists(PathBuf::from("/ws/a.txt"));
        assert_eq!(err.to_string(), "/ws/a.txt already exists");
    }

    #[test]
    fn test_invalid_move_display() {
        let err = AppError::InvalidMove {
            from: PathBuf::from("/ws/foo"),
            into: PathBuf::from("/ws/foo/bar"),
        };
        assert_eq!(err.to_string(), "Cannot move /ws/foo into /ws/foo/bar");
    }

    #[test]
    fn test_session_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let app_err: AppError = json_err.into();
        assert!(app_err.to_string().starts_with("Session error:"));
    }
}
