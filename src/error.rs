//! Crate-wide error type.
//!
//! Every failure in this crate is fatal for the run: callers propagate the
//! error up to the pipeline driver, which aborts the collective and reports.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SobelError {
    /// Worker/unit count or image geometry is unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A file could not be opened, created, read or written.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A raster file was readable but its contents are malformed.
    #[error("malformed raster {}: {reason}", .path.display())]
    Raster { path: PathBuf, reason: String },

    /// Declared raster size disagrees with the configured size.
    #[error(
        "size mismatch in {}: (w,h) = ({},{}) expected ({},{})",
        .path.display(),
        .found.0,
        .found.1,
        .expected.0,
        .expected.1
    )]
    SizeMismatch {
        path: PathBuf,
        found: (usize, usize),
        expected: (usize, usize),
    },

    /// An accessor was used outside the buffer.
    #[error("index ({row}, {col}) out of bounds for {rows}x{cols} buffer")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// A peer unit failed, tearing down the collective.
    #[error("collective aborted: {0}")]
    Aborted(String),

    #[error("json error for {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SobelError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn raster(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Raster {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SobelError>;
