//! Error types for yth-media, one enum per processing stage.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Failures of an external tool invocation, shared by both stages.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Binary not on `PATH`
    #[error("{0} not found on PATH")]
    NotFound(String),

    /// Binary found but could not be started
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Non-zero exit
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Probe errors (ffprobe output, stream presence).
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Input file missing
    #[error("no such file: {0}")]
    Missing(PathBuf),

    #[error(transparent)]
    Tool(#[from] ToolError),

    /// ffprobe JSON did not parse
    #[error("unreadable ffprobe output for {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Expected stream kind absent
    #[error("no {kind} stream in {path}")]
    NoStream { path: PathBuf, kind: &'static str },
}

/// Conversion errors (ffmpeg, image re-encoding).
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input file missing
    #[error("no such file: {0}")]
    Missing(PathBuf),

    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Image decode/encode failure
    #[error("image conversion failed for {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Output directory could not be prepared
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
