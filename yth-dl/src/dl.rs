//! Calls into the [yt-dlp](https://github.com/yt-dlp/yt-dlp) `YoutubeDL` Python API.
//!
//! Parameters are typed Rust structs; results come back as serde values.
//!
//! ```no_run
//! use yth_dl::dl::{extract_info, DownloadOptions};
//! use yth_dl::options::StreamSelection;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let opts: DownloadOptions = StreamSelection::Metadata.into();
//! if let Some(info) = extract_info("https://youtube.com/watch?v=example", opts)? {
//!     println!("Title: {}", info.title);
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Filename templates using `%(field)s` syntax. Key `default` required.
#[derive(Clone, Debug, Default, IntoPyObject)]
pub struct OutputTemplates(pub HashMap<String, String>);

impl OutputTemplates {
    /// Only the `default` template.
    pub fn simple(default: String) -> Self {
        Self(HashMap::from([("default".to_string(), default)]))
    }
}

/// Per-extractor arguments, e.g. `{"youtube": {"player_skip": ["js"]}}`.
#[derive(Clone, Debug, Default, IntoPyObject)]
pub struct ExtractorArgs(pub HashMap<String, HashMap<String, Vec<String>>>);

impl ExtractorArgs {
    pub fn with_arg(self, extractor: &str, key: &str, values: Vec<String>) -> Self {
        let mut inner = self.0;
        inner
            .entry(extractor.to_string())
            .or_default()
            .insert(key.to_string(), values);
        Self(inner)
    }
}

/// yt-dlp download configuration passed to `YoutubeDL(params)`.
///
/// Fields left as `None` are not sent, so yt-dlp applies its own defaults.
#[derive(Clone, Debug, Default, IntoPyObject)]
pub struct DownloadOptions {
    pub format: Option<String>,
    pub outtmpl: Option<OutputTemplates>,
    pub skip_download: Option<bool>,
    pub writethumbnail: Option<bool>,
    pub overwrites: Option<bool>,
    pub noplaylist: Option<bool>,
    pub cookiefile: Option<String>,
    pub http_headers: Option<HashMap<String, String>>,
    pub extractor_args: Option<ExtractorArgs>,
    pub quiet: Option<bool>,
    pub no_warnings: Option<bool>,
    pub verbose: Option<bool>,
    pub debug_printtraffic: Option<bool>,
}

impl DownloadOptions {
    /// Build the params dict: unset keys dropped, yt-dlp output routed to `tracing`.
    fn into_params<'py>(self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let all = self.into_pyobject(py)?;
        let params = PyDict::new(py);

        for (key, value) in all.iter() {
            if !value.is_none() {
                params.set_item(key, value)?;
            }
        }

        params.set_item("logger", Bound::new(py, TracingLogger)?)?;
        Ok(params)
    }
}

/// Metadata mapping returned by yt-dlp for a URL.
///
/// `title` and `description` are always present; every other field of the
/// sanitized info dict is kept verbatim in `fields`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VideoInfo {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl VideoInfo {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Video identifier
    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(Value::as_str)
    }

    /// Length of the video in seconds
    pub fn duration(&self) -> Option<f64> {
        self.get("duration").and_then(Value::as_f64)
    }

    /// Full name of the channel the video was uploaded on
    pub fn channel(&self) -> Option<&str> {
        self.get("channel").and_then(Value::as_str)
    }

    pub fn uploader(&self) -> Option<&str> {
        self.get("uploader").and_then(Value::as_str)
    }

    /// First `lines` lines of the description.
    pub fn description_head(&self, lines: usize) -> String {
        self.description
            .lines()
            .take(lines)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// yt-dlp logger object forwarding messages to `tracing`.
#[pyclass]
struct TracingLogger;

#[pymethods]
impl TracingLogger {
    // yt-dlp sends both screen output and debug lines here
    fn debug(&self, msg: &str) {
        match msg.strip_prefix("[debug] ") {
            Some(msg) => tracing::debug!(target: "yt_dlp", "{msg}"),
            None => tracing::info!(target: "yt_dlp", "{msg}"),
        }
    }

    fn info(&self, msg: &str) {
        tracing::info!(target: "yt_dlp", "{msg}");
    }

    fn warning(&self, msg: &str) {
        tracing::warn!(target: "yt_dlp", "{msg}");
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: "yt_dlp", "{msg}");
    }
}

/// Run `f` against a `YoutubeDL` instance, closing it afterwards whatever the outcome.
fn with_ydl<T>(
    opts: DownloadOptions,
    f: impl for<'py> FnOnce(Python<'py>, &Bound<'py, PyAny>) -> Result<T>,
) -> Result<T> {
    Python::attach(|py| {
        let params = opts.into_params(py)?;
        let ydl = py.import("yt_dlp")?.getattr("YoutubeDL")?.call1((params,))?;

        let result = f(py, &ydl);

        // close() persists the cookie jar
        if let Err(e) = ydl.call_method0("close") {
            tracing::warn!(error = %e, "failed to close YoutubeDL");
        }

        result
    })
}

/// Extract metadata without downloading.
///
/// Uses `extract_info(url, download=False)`; `Ok(None)` when yt-dlp returns nothing.
pub fn extract_info(url: &str, opts: DownloadOptions) -> Result<Option<VideoInfo>> {
    with_ydl(opts, |py, ydl| {
        let kwargs = PyDict::new(py);
        kwargs.set_item("download", false)?;

        let info = ydl.call_method("extract_info", (url,), Some(&kwargs))?;
        if info.is_none() {
            return Ok(None);
        }

        let info = ydl.call_method1("sanitize_info", (info,))?;
        let json: String = py.import("json")?.call_method1("dumps", (info,))?.extract()?;

        Ok(Some(serde_json::from_str(&json)?))
    })
}

/// Download a single URL according to `opts` (output location comes from `outtmpl`).
pub fn download(url: &str, opts: DownloadOptions) -> Result<()> {
    with_ydl(opts, |_py, ydl| {
        let code: i64 = ydl.call_method1("download", (vec![url],))?.extract()?;

        if code != 0 {
            return Err(Error::Download {
                url: url.to_string(),
                code,
            });
        }

        Ok(())
    })
}

/// yt-dlp restricted filename sanitizer: ASCII only, spaces become underscores.
pub fn sanitize_filename(name: &str) -> Result<String> {
    Python::attach(|py| {
        let kwargs = PyDict::new(py);
        kwargs.set_item("restricted", true)?;

        let safe: String = py
            .import("yt_dlp.utils")?
            .call_method("sanitize_filename", (name,), Some(&kwargs))?
            .extract()?;

        Ok(safe)
    })
}
