//! Type-safe Rust bindings to the [yt-dlp](https://github.com/yt-dlp/yt-dlp) Python library.
//!
//! ## Modules
//!
//! - [`options`] - Option builder (stream selection, verbosity, headers, cookies)
//! - [`dl`] - Core yt-dlp API wrappers
//! - [`extractor`] - [`Extractor`] seam and its yt-dlp implementation
//! - [`net`] - URL reachability check
//!
//! ## Quick Start
//!
//! **Metadata only**:
//! ```no_run
//! use yth_dl::{Extractor, YtDlp};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ytdlp = YtDlp::default();
//! if let Some(info) = ytdlp.extract_info("https://youtube.com/watch?v=example")? {
//!     println!("{}", info.title);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! **Custom configuration**:
//! ```no_run
//! use yth_dl::options::{ExtractorConfig, StreamSelection, Verbosity};
//! use yth_dl::{Extractor, YtDlp};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtractorConfig {
//!     verbosity: Verbosity::Normal,
//!     player_skip: vec!["js".to_string()],
//!     ..Default::default()
//! };
//!
//! YtDlp::new(config).download(
//!     "https://youtube.com/watch?v=example",
//!     StreamSelection::Audio,
//!     "/tmp/downloads/audio.%(ext)s",
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod dl;
pub mod error;
pub mod extractor;
pub mod net;
pub mod options;

pub use dl::VideoInfo;
pub use error::{Error, Result};
pub use extractor::{Extractor, YtDlp};
