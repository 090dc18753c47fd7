use std::path::PathBuf;
use thiserror::Error;

/// Result type for lexer operations
pub type Result<T> = std::result::Result<T, LexerError>;

/// Errors that can occur while indexing a single file
#[derive(Error, Debug)]
pub enum LexerError {
    /// The file could not be read as UTF-8 text
    #[error("IO error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LexerError {
    /// Create an IO error for `path`
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Path of the file that failed
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::IoError { path, .. } => path,
        }
    }
}
