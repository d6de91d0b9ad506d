//! Transcoding and multiplexing through the `ffmpeg` binary.
//!
//! Every invocation overwrites its output and blocks until ffmpeg exits.

use crate::error::{ConvertError, ToolError};
use crate::tool;
use crate::types::VideoConversion;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// ffmpeg `-loglevel` values.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    #[default]
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    /// Map a 0-3 verbosity level. Level 0 still keeps errors so failures can be reported.
    pub fn from_verbosity(level: u8) -> Self {
        match level {
            0 => Self::Error,
            1 => Self::Warning,
            2 => Self::Info,
            _ => Self::Debug,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

/// ffmpeg runner.
#[derive(Clone, Debug)]
pub struct Ffmpeg {
    pub program: PathBuf,
    pub loglevel: LogLevel,
}

impl Ffmpeg {
    /// Find `ffmpeg` on `PATH`.
    pub fn locate(loglevel: LogLevel) -> Result<Self, ToolError> {
        Ok(Self {
            program: tool::locate("ffmpeg")?,
            loglevel,
        })
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            loglevel: LogLevel::default(),
        }
    }

    /// Common prefix: overwrite, no banner, no stdin, then one `-i` per input.
    fn base_args(&self, inputs: &[&Path]) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-y", "-hide_banner", "-nostdin", "-loglevel"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(self.loglevel.as_str().into());

        for input in inputs {
            args.push("-i".into());
            args.push(input.as_os_str().to_owned());
        }

        args
    }

    /// `-vn -ar <rate>`; codec follows the output extension.
    pub fn audio_args(&self, input: &Path, output: &Path, sample_rate: u32) -> Vec<OsString> {
        let mut args = self.base_args(&[input]);
        args.extend(["-vn", "-ar"].map(OsString::from));
        args.push(sample_rate.to_string().into());
        args.push(output.as_os_str().to_owned());
        args
    }

    /// Optional `-an` and `scale=-2:<height>` (even width, aspect kept).
    pub fn video_args(&self, input: &Path, output: &Path, conv: &VideoConversion) -> Vec<OsString> {
        let mut args = self.base_args(&[input]);

        if conv.without_sound {
            args.push("-an".into());
        }
        if let Some(height) = conv.height {
            args.push("-vf".into());
            args.push(format!("scale=-2:{height}").into());
        }

        args.push(output.as_os_str().to_owned());
        args
    }

    /// First video stream of `video` stream-copied, first audio stream of `audio` encoded to AAC.
    pub fn mux_args(&self, video: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
        let mut args = self.base_args(&[video, audio]);
        args.extend(
            [
                "-map",
                "0:v:0",
                "-map",
                "1:a:0",
                "-c:v",
                "copy",
                "-c:a",
                "aac",
                "-strict",
                "experimental",
            ]
            .map(OsString::from),
        );
        args.push(output.as_os_str().to_owned());
        args
    }

    pub fn convert_audio(
        &self,
        input: &Path,
        output: &Path,
        sample_rate: u32,
    ) -> Result<(), ConvertError> {
        tracing::info!(input = %input.display(), output = %output.display(), sample_rate, "converting audio");
        self.execute(&[input], output, self.audio_args(input, output, sample_rate))
    }

    pub fn convert_video(
        &self,
        input: &Path,
        output: &Path,
        conv: &VideoConversion,
    ) -> Result<(), ConvertError> {
        tracing::info!(input = %input.display(), output = %output.display(), ?conv, "converting video");
        self.execute(&[input], output, self.video_args(input, output, conv))
    }

    pub fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), ConvertError> {
        tracing::info!(
            video = %video.display(),
            audio = %audio.display(),
            output = %output.display(),
            "muxing streams"
        );
        self.execute(&[video, audio], output, self.mux_args(video, audio, output))
    }

    fn execute(&self, inputs: &[&Path], output: &Path, args: Vec<OsString>) -> Result<(), ConvertError> {
        if let Some(missing) = inputs.iter().find(|p| !p.is_file()) {
            return Err(ConvertError::Missing(missing.to_path_buf()));
        }
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        tool::run(&self.program, &args)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn audio_args_resample() {
        let ffmpeg = Ffmpeg::with_program("ffmpeg");
        let args = ffmpeg.audio_args(Path::new("in.webm"), Path::new("out.mp3"), 44100);

        assert_eq!(
            strings(&args),
            vec![
                "-y", "-hide_banner", "-nostdin", "-loglevel", "error", "-i", "in.webm", "-vn",
                "-ar", "44100", "out.mp3"
            ]
        );
    }

    #[test]
    fn video_args_strip_sound_and_rescale() {
        let ffmpeg = Ffmpeg::with_program("ffmpeg");
        let conv = VideoConversion {
            height: Some(240),
            without_sound: true,
        };
        let args = strings(&ffmpeg.video_args(Path::new("v.mp4"), Path::new("low.mp4"), &conv));

        assert_eq!(
            &args[5..],
            ["-i", "v.mp4", "-an", "-vf", "scale=-2:240", "low.mp4"]
        );
    }

    #[test]
    fn video_args_plain_reencode() {
        let ffmpeg = Ffmpeg::with_program("ffmpeg");
        let args = strings(&ffmpeg.video_args(
            Path::new("v.webm"),
            Path::new("v.mp4"),
            &VideoConversion::default(),
        ));

        assert_eq!(&args[5..], ["-i", "v.webm", "v.mp4"]);
    }

    #[test]
    fn mux_copies_video_and_encodes_aac() {
        let ffmpeg = Ffmpeg {
            program: PathBuf::from("ffmpeg"),
            loglevel: LogLevel::from_verbosity(2),
        };
        let args = strings(&ffmpeg.mux_args(
            Path::new("video.mp4"),
            Path::new("audio.mp3"),
            Path::new("out.mp4"),
        ));

        assert_eq!(args[4], "info");
        assert_eq!(
            &args[5..],
            [
                "-i", "video.mp4", "-i", "audio.mp3", "-map", "0:v:0", "-map", "1:a:0", "-c:v",
                "copy", "-c:a", "aac", "-strict", "experimental", "out.mp4"
            ]
        );
    }

    #[test]
    fn missing_input_fails_before_running() {
        let ffmpeg = Ffmpeg::with_program("ffmpeg");
        let err = ffmpeg
            .convert_audio(Path::new("/nonexistent/in.m4a"), Path::new("out.mp3"), 44100)
            .unwrap_err();

        assert!(matches!(err, ConvertError::Missing(p) if p == Path::new("/nonexistent/in.m4a")));
    }

    #[test]
    fn loglevels() {
        assert_eq!(LogLevel::default(), LogLevel::Error);
        let levels: Vec<_> = (0..=3).map(|v| LogLevel::from_verbosity(v).as_str()).collect();
        assert_eq!(levels, ["error", "warning", "info", "debug"]);
        assert_eq!(LogLevel::from_verbosity(9).as_str(), "debug");
    }
}
