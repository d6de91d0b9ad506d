//! Media validation through `ffprobe` JSON output.

use crate::error::{ProbeError, ToolError};
use crate::tool;
use crate::types::{AudioProperties, VideoDimensions};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// `ffprobe -show_format -show_streams` output (only the fields used here).
#[derive(Debug, Default, Deserialize)]
pub struct ProbeOutput {
    #[serde(default)]
    pub streams: Vec<Stream>,
    pub format: Option<Format>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Stream {
    pub codec_type: Option<String>,
    pub codec_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub avg_frame_rate: Option<String>,
    pub r_frame_rate: Option<String>,
    pub sample_rate: Option<String>,
    pub channels: Option<u32>,
    pub duration: Option<String>,
    #[serde(default)]
    pub disposition: Disposition,
}

#[derive(Debug, Default, Deserialize)]
pub struct Disposition {
    /// Embedded cover art rather than a real video track
    #[serde(default)]
    pub attached_pic: u8,
}

#[derive(Debug, Default, Deserialize)]
pub struct Format {
    pub duration: Option<String>,
    pub format_name: Option<String>,
}

impl Stream {
    fn is(&self, kind: &str) -> bool {
        self.codec_type.as_deref() == Some(kind)
    }
}

impl ProbeOutput {
    pub fn parse(path: &Path, json: &[u8]) -> Result<Self, ProbeError> {
        serde_json::from_slice(json).map_err(|source| ProbeError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Stream duration, falling back to the container's.
    fn duration_of(&self, stream: &Stream) -> f64 {
        stream
            .duration
            .as_deref()
            .and_then(|d| d.parse().ok())
            .or_else(|| {
                self.format
                    .as_ref()
                    .and_then(|f| f.duration.as_deref())
                    .and_then(|d| d.parse().ok())
            })
            .unwrap_or(0.0)
    }

    pub fn audio_properties(&self, path: &Path) -> Result<AudioProperties, ProbeError> {
        let stream = self
            .streams
            .iter()
            .find(|s| s.is("audio"))
            .ok_or_else(|| ProbeError::NoStream {
                path: path.to_path_buf(),
                kind: "audio",
            })?;

        Ok(AudioProperties {
            duration: self.duration_of(stream),
            sample_rate: stream
                .sample_rate
                .as_deref()
                .and_then(|r| r.parse().ok())
                .unwrap_or(0),
            channels: stream.channels.unwrap_or(0),
            codec: stream.codec_name.clone(),
        })
    }

    pub fn video_dimensions(&self, path: &Path) -> Result<VideoDimensions, ProbeError> {
        let stream = self
            .streams
            .iter()
            .find(|s| s.is("video") && s.disposition.attached_pic == 0)
            .ok_or_else(|| ProbeError::NoStream {
                path: path.to_path_buf(),
                kind: "video",
            })?;

        let frame_rate = [&stream.avg_frame_rate, &stream.r_frame_rate]
            .into_iter()
            .filter_map(|r| r.as_deref().and_then(parse_rational))
            .find(|r| *r > 0.0)
            .unwrap_or(0.0);

        Ok(VideoDimensions {
            width: stream.width.unwrap_or(0),
            height: stream.height.unwrap_or(0),
            duration: self.duration_of(stream),
            frame_rate,
            has_sound: self.streams.iter().any(|s| s.is("audio")),
        })
    }
}

/// Parse ffprobe rationals such as `30000/1001`; `0/0` yields 0.
pub fn parse_rational(value: &str) -> Option<f64> {
    match value.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            Some(if den == 0.0 { 0.0 } else { num / den })
        }
        None => value.trim().parse().ok(),
    }
}

/// ffprobe runner.
#[derive(Clone, Debug)]
pub struct Ffprobe {
    pub program: PathBuf,
}

impl Ffprobe {
    /// Find `ffprobe` on `PATH`.
    pub fn locate() -> Result<Self, ToolError> {
        Ok(Self::with_program(tool::locate("ffprobe")?))
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn probe(&self, path: &Path) -> Result<ProbeOutput, ProbeError> {
        if !path.is_file() {
            return Err(ProbeError::Missing(path.to_path_buf()));
        }

        let args: Vec<OsString> = [
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ]
        .into_iter()
        .map(OsString::from)
        .chain([path.as_os_str().to_owned()])
        .collect();

        let output = tool::run(&self.program, &args)?;
        ProbeOutput::parse(path, &output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIDEO_JSON: &str = r#"{
        "streams": [
            {"codec_type": "video", "codec_name": "h264", "width": 426, "height": 240,
             "avg_frame_rate": "24/1", "r_frame_rate": "24/1", "duration": "596.458",
             "disposition": {"attached_pic": 0}},
            {"codec_type": "audio", "codec_name": "aac", "sample_rate": "44100",
             "channels": 2, "duration": "596.474"}
        ],
        "format": {"duration": "596.474", "format_name": "mov,mp4,m4a,3gp,3g2,mj2"}
    }"#;

    const MP3_WITH_COVER_JSON: &str = r#"{
        "streams": [
            {"codec_type": "audio", "codec_name": "mp3", "sample_rate": "44100", "channels": 2},
            {"codec_type": "video", "codec_name": "mjpeg", "width": 320, "height": 180,
             "avg_frame_rate": "0/0", "r_frame_rate": "90000/1",
             "disposition": {"attached_pic": 1}}
        ],
        "format": {"duration": "12.5", "format_name": "mp3"}
    }"#;

    fn parse(json: &str) -> ProbeOutput {
        ProbeOutput::parse(Path::new("test"), json.as_bytes()).unwrap()
    }

    #[test]
    fn parses_video_dimensions() {
        let dims = parse(VIDEO_JSON)
            .video_dimensions(Path::new("test"))
            .unwrap();

        assert_eq!(dims.width, 426);
        assert_eq!(dims.height, 240);
        assert!((dims.duration - 596.458).abs() < 1e-9);
        assert!((dims.frame_rate - 24.0).abs() < 1e-9);
        assert!(dims.has_sound);
        assert!(dims.is_valid());
    }

    #[test]
    fn audio_duration_falls_back_to_container() {
        let props = parse(MP3_WITH_COVER_JSON)
            .audio_properties(Path::new("test"))
            .unwrap();

        assert_eq!(props.sample_rate, 44100);
        assert_eq!(props.channels, 2);
        assert!((props.duration - 12.5).abs() < 1e-9);
        assert!(props.is_valid());
    }

    #[test]
    fn cover_art_is_not_a_video() {
        let err = parse(MP3_WITH_COVER_JSON)
            .video_dimensions(Path::new("song.mp3"))
            .unwrap_err();

        assert!(matches!(err, ProbeError::NoStream { kind: "video", .. }));
    }

    #[test]
    fn silent_video_has_no_sound() {
        let json = r#"{"streams": [{"codec_type": "video", "width": 2, "height": 2,
                       "avg_frame_rate": "30000/1001", "duration": "1.0"}]}"#;
        let output = parse(json);
        let dims = output.video_dimensions(Path::new("test")).unwrap();

        assert!(!dims.has_sound);
        assert!((dims.frame_rate - 29.97).abs() < 0.01);
        assert!(output.audio_properties(Path::new("test")).is_err());
    }

    #[test]
    fn rejects_garbage_json() {
        let err = ProbeOutput::parse(Path::new("x.mp4"), b"not json").unwrap_err();
        assert!(matches!(err, ProbeError::Json { .. }));
    }

    #[test]
    fn rationals() {
        assert_eq!(parse_rational("24/1"), Some(24.0));
        assert_eq!(parse_rational("0/0"), Some(0.0));
        assert_eq!(parse_rational("25"), Some(25.0));
        assert_eq!(parse_rational("abc"), None);
    }

    #[test]
    fn missing_file_is_reported_before_running() {
        let probe = Ffprobe::with_program("ffprobe");
        let err = probe.probe(Path::new("/nonexistent/clip.mp4")).unwrap_err();

        assert!(matches!(err, ProbeError::Missing(_)));
    }
}
