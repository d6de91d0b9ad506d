//! Orchestration errors.

use crate::naming::MediaKind;
use crate::scratch::LocateError;
use std::path::PathBuf;
use thiserror::Error;
use yth_media::error::{ConvertError, ProbeError, ToolError};

#[derive(Debug, Error)]
pub enum Error {
    /// Empty or unreachable URL
    #[error("invalid or unreachable video url: {url:?}")]
    InvalidUrl { url: String },

    /// The extraction tool raised
    #[error("yt-dlp failed on {url}: {source}")]
    Extract {
        url: String,
        #[source]
        source: yth_dl::Error,
    },

    /// The extraction tool returned nothing
    #[error("yt-dlp returned no metadata for {url}")]
    NoMetadata { url: String },

    /// Zero or several files produced
    #[error("{kind} download from {url} to {} failed: {source}", dest.display())]
    Output {
        url: String,
        kind: MediaKind,
        dest: PathBuf,
        #[source]
        source: LocateError,
    },

    /// Produced or supplied file failed its validator
    #[error("invalid {kind} file {} for {} (from {url})", path.display(), dest.display())]
    Invalid {
        url: String,
        kind: MediaKind,
        /// The file that failed validation
        path: PathBuf,
        dest: PathBuf,
    },

    #[error("{} has no audio track (from {url})", path.display())]
    MissingAudioTrack { url: String, path: PathBuf },

    #[error("failed to inspect {} (from {url}): {source}", path.display())]
    Probe {
        url: String,
        path: PathBuf,
        #[source]
        source: ProbeError,
    },

    /// Transcoder or image library failure
    #[error("failed to convert {kind} for {} (from {url}): {source}", dest.display())]
    Convert {
        url: String,
        kind: MediaKind,
        dest: PathBuf,
        #[source]
        source: ConvertError,
    },

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required external binary is unavailable
    #[error(transparent)]
    Tool(#[from] ToolError),
}

impl Error {
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
