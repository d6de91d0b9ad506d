//! Error types for yth-dl.

use pyo3::PyErr;
use thiserror::Error;

/// Extraction tool failures.
#[derive(Debug, Error)]
pub enum Error {
    /// yt-dlp raised (unsupported site, removed video, network failure, missing module)
    #[error(transparent)]
    Python(#[from] PyErr),

    /// Info dict could not be read back as JSON
    #[error("malformed metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    /// `download()` finished with a non-zero return code
    #[error("yt-dlp returned code {code} for {url}")]
    Download { url: String, code: i64 },
}

/// Result type alias for yth-dl operations.
pub type Result<T> = std::result::Result<T, Error>;
