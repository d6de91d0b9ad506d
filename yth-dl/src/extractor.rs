//! Extraction tool seam.

use crate::dl::{self, VideoInfo};
use crate::error::Result;
use crate::options::{ExtractorConfig, StreamSelection};

/// Resolves hosted-video URLs into metadata or files on disk.
///
/// [`YtDlp`] is the production implementation; the trait lets callers swap in
/// other tools.
pub trait Extractor {
    /// Metadata-only extraction. `Ok(None)` when the tool returns nothing.
    fn extract_info(&self, url: &str) -> Result<Option<VideoInfo>>;

    /// Write the selected stream(s) to a file named by `outtmpl`
    /// (a path ending in `.%(ext)s`).
    fn download(&self, url: &str, selection: StreamSelection, outtmpl: &str) -> Result<()>;

    /// ASCII-safe file stem for `name`.
    fn safe_filename(&self, name: &str) -> String {
        fallback_filename(name)
    }

    /// Whether the URL answers over the network.
    fn is_reachable(&self, url: &str) -> bool {
        crate::net::is_working_url(url)
    }
}

/// yt-dlp through its Python API.
#[derive(Clone, Debug, Default)]
pub struct YtDlp {
    pub config: ExtractorConfig,
}

impl YtDlp {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }
}

impl Extractor for YtDlp {
    fn extract_info(&self, url: &str) -> Result<Option<VideoInfo>> {
        let opts = self.config.options(StreamSelection::Metadata, None);
        dl::extract_info(url, opts)
    }

    fn download(&self, url: &str, selection: StreamSelection, outtmpl: &str) -> Result<()> {
        tracing::debug!(url, ?selection, outtmpl, "yt-dlp download");

        let opts = self.config.options(selection, Some(outtmpl));
        dl::download(url, opts)
    }

    /// Checks with the configured user agent and headers, as yt-dlp would send them.
    fn is_reachable(&self, url: &str) -> bool {
        crate::net::is_working_url_with(url, &self.config.request_headers())
    }

    fn safe_filename(&self, name: &str) -> String {
        match dl::sanitize_filename(name) {
            Ok(safe) if !safe.trim_matches(['_', '.']).is_empty() => safe,
            Ok(_) => fallback_filename(name),
            Err(e) => {
                tracing::warn!(error = %e, "yt-dlp sanitizer unavailable, using fallback");
                fallback_filename(name)
            }
        }
    }
}

/// Conservative sanitizer: ASCII alphanumerics, `-` and `_`; anything else
/// becomes `_`, runs collapse, and an empty result is `untitled`.
pub fn fallback_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());

    for c in name.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '-' {
            c
        } else {
            '_'
        };
        if !(c == '_' && out.ends_with('_')) {
            out.push(c);
        }
    }

    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}
