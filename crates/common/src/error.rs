//! Error types shared across the documentation crates.

use std::path::{Path, PathBuf};

/// Top-level error type for documentation build operations.
#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error("Chapter error: {message}")]
    Chapter { message: String },

    #[error("Image audit error: {message}")]
    Images { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    IoAt {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using DocsError.
pub type DocsResult<T> = Result<T, DocsError>;

impl DocsError {
    pub fn chapter(msg: impl Into<String>) -> Self {
        Self::Chapter {
            message: msg.into(),
        }
    }

    pub fn images(msg: impl Into<String>) -> Self {
        Self::Images {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Attach the path that an I/O operation failed on.
    pub fn io_at(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::not_found(path.as_ref());
        }
        Self::IoAt {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_at_maps_not_found() {
        let err = DocsError::io_at(
            "md/missing.md",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, DocsError::FileNotFound { .. }));
        assert_eq!(err.to_string(), "File not found: md/missing.md");
    }

    #[test]
    fn test_io_at_keeps_path_in_message() {
        let err = DocsError::io_at(
            "README.md",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("README.md"));
        assert!(err.to_string().contains("denied"));
    }
}
