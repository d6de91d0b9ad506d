//! Core traits for the media collaborators.

use crate::error::{ConvertError, ProbeError};
use crate::ffmpeg::Ffmpeg;
use crate::probe::Ffprobe;
use crate::types::{AudioProperties, VideoConversion, VideoDimensions};
use std::path::Path;

/// Re-encodes and multiplexes media files.
///
/// Implementations always overwrite `output`.
pub trait Transcoder {
    /// Re-encode audio to the container implied by `output`, resampled to `sample_rate`.
    fn convert_audio(&self, input: &Path, output: &Path, sample_rate: u32)
    -> Result<(), ConvertError>;

    /// Re-encode video to the container implied by `output`.
    fn convert_video(
        &self,
        input: &Path,
        output: &Path,
        conv: &VideoConversion,
    ) -> Result<(), ConvertError>;

    /// Combine the video stream of `video` (stream-copied) with the audio stream of `audio`.
    fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), ConvertError>;

    /// Re-encode a still image to the format implied by `output`.
    fn convert_image(&self, input: &Path, output: &Path) -> Result<(), ConvertError> {
        crate::imaging::convert_image(input, output)
    }
}

/// Validates media files and reports their structured properties.
pub trait Validator {
    fn audio_properties(&self, path: &Path) -> Result<AudioProperties, ProbeError>;

    fn video_dimensions(&self, path: &Path) -> Result<VideoDimensions, ProbeError>;

    fn is_valid_audio_file(&self, path: &Path) -> bool {
        match self.audio_properties(path) {
            Ok(props) => props.is_valid(),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "not a valid audio file");
                false
            }
        }
    }

    fn is_valid_video_file(&self, path: &Path) -> bool {
        match self.video_dimensions(path) {
            Ok(dims) => dims.is_valid(),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "not a valid video file");
                false
            }
        }
    }
}

impl Transcoder for Ffmpeg {
    fn convert_audio(
        &self,
        input: &Path,
        output: &Path,
        sample_rate: u32,
    ) -> Result<(), ConvertError> {
        Ffmpeg::convert_audio(self, input, output, sample_rate)
    }

    fn convert_video(
        &self,
        input: &Path,
        output: &Path,
        conv: &VideoConversion,
    ) -> Result<(), ConvertError> {
        Ffmpeg::convert_video(self, input, output, conv)
    }

    fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), ConvertError> {
        Ffmpeg::mux(self, video, audio, output)
    }
}

impl Validator for Ffprobe {
    fn audio_properties(&self, path: &Path) -> Result<AudioProperties, ProbeError> {
        self.probe(path)?.audio_properties(path)
    }

    fn video_dimensions(&self, path: &Path) -> Result<VideoDimensions, ProbeError> {
        self.probe(path)?.video_dimensions(path)
    }
}
