//! Error types shared across Segue crates.

use std::path::PathBuf;

/// Top-level error type for Segue operations outside the pure engine.
///
/// The layout engine reports its own structured `BuildError`; outer layers
/// fold it into [`SegueError::Build`] once it has been surfaced.
#[derive(Debug, thiserror::Error)]
pub enum SegueError {
    #[error("Build error: {message}")]
    Build { message: String },

    #[error("Project error: {message}")]
    Project { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SegueError.
pub type SegueResult<T> = Result<T, SegueError>;

impl SegueError {
    pub fn build(msg: impl Into<String>) -> Self {
        Self::Build {
            message: msg.into(),
        }
    }

    pub fn project(msg: impl Into<String>) -> Self {
        Self::Project {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_keep_message() {
        let err = SegueError::build("transition too long");
        assert_eq!(err.to_string(), "Build error: transition too long");

        let err = SegueError::render("no backend");
        assert!(matches!(err, SegueError::Render { .. }));
    }

    #[test]
    fn test_io_error_converts() {
        fn fails() -> SegueResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(SegueError::Io(_))));
    }
}
