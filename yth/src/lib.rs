//! yth: fetch thumbnails, audio and video from hosted-video URLs.
//!
//! [`YtHelper`] drives yt-dlp (metadata and downloads) and ffmpeg/ffprobe
//! (transcoding and validation) through the seams in [`yth_dl::Extractor`],
//! [`yth_media::traits::Transcoder`] and [`yth_media::traits::Validator`].
//!
//! Every download resolves its destination, returns early when a valid file
//! is already there, stages the tool output in an auto-deleted scratch
//! directory, converts it when the requested extension differs, and only
//! then moves it into place.
//!
//! ```no_run
//! use std::path::Path;
//! use yth::{Config, YtHelper};
//!
//! let helper = YtHelper::new(Config::default())?;
//! let url = "https://www.youtube.com/watch?v=YE7VzlLtp-4";
//!
//! if helper.is_valid_video_url(url) {
//!     helper.download_audio(url, Some(Path::new("bunny.mp3")), None)?;
//!     helper.download_bad_video_with_good_sound(url, Some(Path::new("bunny_240p.mp4")), None)?;
//! }
//! # Ok::<(), yth::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod fsops;
pub mod helper;
pub mod naming;
pub mod scratch;

pub use config::Config;
pub use error::{Error, Result};
pub use helper::YtHelper;
pub use naming::MediaKind;
