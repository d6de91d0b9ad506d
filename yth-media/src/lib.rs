//! yth-media: the transcoding and validation collaborators behind yt-helper.
//!
//! Every operation shells out to `ffmpeg` / `ffprobe` (found on `PATH`) or
//! re-encodes still images in process.
//!
//! # Architecture
//!
//! Two traits form the seams used by the orchestration layer:
//!
//! - [`traits::Transcoder`]: audio/video re-encoding, multiplexing, image conversion
//! - [`traits::Validator`]: validity checks and structured properties
//!
//! # Quick Start
//!
//! ```ignore
//! use yth_media::ffmpeg::{Ffmpeg, LogLevel};
//! use yth_media::probe::Ffprobe;
//! use yth_media::traits::{Transcoder, Validator};
//!
//! let ffmpeg = Ffmpeg::locate(LogLevel::Error)?;
//! ffmpeg.convert_audio("in.webm".as_ref(), "out.mp3".as_ref(), 44100)?;
//!
//! let ffprobe = Ffprobe::locate()?;
//! assert!(ffprobe.is_valid_audio_file("out.mp3".as_ref()));
//! ```

pub mod error;
pub mod ffmpeg;
pub mod imaging;
pub mod probe;
pub mod tool;
pub mod traits;
pub mod types;
