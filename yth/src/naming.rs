//! Media kinds and destination path resolution.
//!
//! Rules for destinations:
//! - an explicit path is made absolute; without an extension the kind's
//!   default one is appended
//! - an omitted path becomes `<output_dir>/<safe title>[_<timestamp>].<default ext>`
//!   where the safe title is ASCII-only with spaces replaced by underscores
//! - the low-resolution composite appends its height to the title
//!   (`<safe title>_240p.mp4`) so it never lands on a plain video download

use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};
use yth_dl::options::StreamSelection;

/// Timestamp format appended to derived names.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Kind of file a pipeline produces.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Thumbnail,
    Audio,
    Video,
}

impl MediaKind {
    pub fn default_extension(self) -> &'static str {
        match self {
            Self::Thumbnail => "png",
            Self::Audio => "mp3",
            Self::Video => "mp4",
        }
    }

    pub fn selection(self) -> StreamSelection {
        match self {
            Self::Thumbnail => StreamSelection::Thumbnail,
            Self::Audio => StreamSelection::Audio,
            Self::Video => StreamSelection::Video,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Thumbnail => "thumbnail",
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased extension of `path`.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

/// Whether a file with extension `received` already is in the format `wanted`.
pub fn same_extension(kind: MediaKind, received: &str, wanted: &str) -> bool {
    match kind {
        MediaKind::Thumbnail => yth_media::imaging::same_format(received, wanted),
        MediaKind::Audio | MediaKind::Video => received.eq_ignore_ascii_case(wanted),
    }
}

/// Absolute form of a caller-supplied destination.
pub fn explicit_destination(path: &Path, kind: MediaKind) -> std::io::Result<PathBuf> {
    let path = std::path::absolute(path)?;

    Ok(match path.extension() {
        Some(_) => path,
        None => path.with_extension(kind.default_extension()),
    })
}

/// Title stem of a composite rescaled to `height`.
pub fn composite_title(safe_title: &str, height: u32) -> String {
    format!("{safe_title}_{height}p")
}

/// Destination derived from a sanitized title.
pub fn derived_destination(
    output_dir: &Path,
    safe_title: &str,
    kind: MediaKind,
    timestamp: Option<DateTime<Local>>,
) -> PathBuf {
    let stem = match timestamp {
        Some(ts) => format!("{safe_title}_{}", ts.format(TIMESTAMP_FORMAT)),
        None => safe_title.to_string(),
    };

    output_dir.join(format!("{stem}.{}", kind.default_extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn defaults_per_kind() {
        assert_eq!(MediaKind::Thumbnail.default_extension(), "png");
        assert_eq!(MediaKind::Audio.default_extension(), "mp3");
        assert_eq!(MediaKind::Video.default_extension(), "mp4");
        assert_eq!(MediaKind::Audio.selection(), StreamSelection::Audio);
    }

    #[test]
    fn explicit_keeps_extension_and_becomes_absolute() {
        let dest = explicit_destination(Path::new("clips/bunny.MKV"), MediaKind::Video).unwrap();

        assert!(dest.is_absolute());
        assert!(dest.ends_with("clips/bunny.MKV"));
        assert_eq!(extension_of(&dest).as_deref(), Some("mkv"));
    }

    #[test]
    fn explicit_without_extension_gets_default() {
        let dest = explicit_destination(Path::new("/tmp/song"), MediaKind::Audio).unwrap();
        assert_eq!(dest, PathBuf::from("/tmp/song.mp3"));
    }

    #[test]
    fn derived_from_title() {
        let dest = derived_destination(
            Path::new("/downloads"),
            "Big_Buck_Bunny",
            MediaKind::Thumbnail,
            None,
        );
        assert_eq!(dest, PathBuf::from("/downloads/Big_Buck_Bunny.png"));
    }

    #[test]
    fn composite_name_differs_from_video() {
        let video = derived_destination(Path::new("/d"), "clip", MediaKind::Video, None);
        let composite = derived_destination(
            Path::new("/d"),
            &composite_title("clip", 240),
            MediaKind::Video,
            None,
        );

        assert_eq!(composite, PathBuf::from("/d/clip_240p.mp4"));
        assert_ne!(composite, video);
    }

    #[test]
    fn derived_with_timestamp() {
        let ts = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let dest = derived_destination(Path::new("/d"), "clip", MediaKind::Video, Some(ts));

        assert_eq!(dest, PathBuf::from("/d/clip_20240309_140507.mp4"));
    }

    #[test]
    fn extension_comparison() {
        assert!(same_extension(MediaKind::Thumbnail, "jpeg", "JPG"));
        assert!(!same_extension(MediaKind::Thumbnail, "webp", "png"));
        assert!(same_extension(MediaKind::Audio, "MP3", "mp3"));
        assert!(!same_extension(MediaKind::Audio, "m4a", "mp3"));
        assert!(!same_extension(MediaKind::Video, "webm", "mp4"));
    }
}
