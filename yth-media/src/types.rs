//! Core types for yth-media

/// Structured properties of an audio file.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioProperties {
    /// Duration in seconds
    pub duration: f64,
    /// Sample rate in Hz
    pub sample_rate: u32,
    pub channels: u32,
    pub codec: Option<String>,
}

impl AudioProperties {
    pub fn is_valid(&self) -> bool {
        self.duration > 0.0 && self.sample_rate > 0
    }
}

/// Structured properties of a video file.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoDimensions {
    pub width: u32,
    pub height: u32,
    /// Duration in seconds
    pub duration: f64,
    /// Frames per second
    pub frame_rate: f64,
    /// Whether at least one audio stream is present
    pub has_sound: bool,
}

impl VideoDimensions {
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.duration > 0.0
    }
}

/// Video re-encode parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VideoConversion {
    /// Target height in pixels; width follows the aspect ratio
    pub height: Option<u32>,
    /// Drop every audio stream
    pub without_sound: bool,
}
