//! Option builder: stream selection, verbosity and anti-blocking settings.
//!
//! **Selections:** [`StreamSelection::Metadata`], [`StreamSelection::Audio`],
//! [`StreamSelection::Video`], [`StreamSelection::Thumbnail`]
//!
//! ```no_run
//! use yth_dl::options::{ExtractorConfig, StreamSelection};
//! let opts = ExtractorConfig::default().options(StreamSelection::Audio, Some("/tmp/x/audio.%(ext)s"));
//! assert_eq!(opts.format.as_deref(), Some("bestaudio/best"));
//! ```

use crate::dl::{DownloadOptions, ExtractorArgs, OutputTemplates};
use std::collections::HashMap;
use std::path::PathBuf;

/// Desktop browser user agent sent unless overridden.
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36";

/// Output verbosity shared by the extraction and transcoding tools.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Errors only
    #[default]
    Quiet,
    /// Progress and warnings
    Normal,
    /// Tool debug output
    Verbose,
    /// Debug output plus HTTP traffic
    Traffic,
}

impl From<u8> for Verbosity {
    fn from(level: u8) -> Self {
        match level {
            0 => Self::Quiet,
            1 => Self::Normal,
            2 => Self::Verbose,
            _ => Self::Traffic,
        }
    }
}

/// What the extraction tool should produce.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StreamSelection {
    /// Info dict only, nothing written
    Metadata,
    /// Best audio stream
    Audio,
    /// Best video merged with best audio
    Video,
    /// Thumbnail image only
    Thumbnail,
}

impl StreamSelection {
    /// yt-dlp format selector, if any.
    pub fn format(self) -> Option<&'static str> {
        match self {
            Self::Audio => Some("bestaudio/best"),
            Self::Video => Some("bestvideo+bestaudio/best"),
            Self::Metadata | Self::Thumbnail => None,
        }
    }
}

/// Caller-side extractor settings, turned into [`DownloadOptions`] per call.
#[derive(Clone, Debug)]
pub struct ExtractorConfig {
    pub verbosity: Verbosity,
    /// Overwrite files already present in the output location
    pub overwrites: bool,
    /// `User-Agent` header; `None` keeps yt-dlp's own
    pub user_agent: Option<String>,
    /// YouTube `player_skip` extractor argument (e.g. `["js"]`)
    pub player_skip: Vec<String>,
    /// Netscape cookie file handed to yt-dlp
    pub cookie_file: Option<PathBuf>,
    /// Extra HTTP headers
    pub http_headers: HashMap<String, String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::default(),
            overwrites: true,
            user_agent: Some(DESKTOP_USER_AGENT.to_string()),
            player_skip: Vec::new(),
            cookie_file: None,
            http_headers: HashMap::new(),
        }
    }
}

impl ExtractorConfig {
    /// `http_headers` with the configured `User-Agent`, which replaces any
    /// user agent given there.
    pub fn request_headers(&self) -> HashMap<String, String> {
        let mut headers = self.http_headers.clone();

        if let Some(ua) = &self.user_agent {
            headers.retain(|name, _| !name.eq_ignore_ascii_case("user-agent"));
            headers.insert("User-Agent".to_string(), ua.clone());
        }
        headers
    }

    /// Build the option mapping for one extraction call.
    pub fn options(&self, selection: StreamSelection, outtmpl: Option<&str>) -> DownloadOptions {
        let v = self.verbosity;

        let headers = self.request_headers();

        let extractor_args = (!self.player_skip.is_empty()).then(|| {
            ExtractorArgs::default().with_arg("youtube", "player_skip", self.player_skip.clone())
        });

        let thumbnail = selection == StreamSelection::Thumbnail;

        DownloadOptions {
            format: selection.format().map(str::to_string),
            outtmpl: outtmpl.map(|t| OutputTemplates::simple(t.to_string())),
            skip_download: thumbnail.then_some(true),
            writethumbnail: thumbnail.then_some(true),
            overwrites: Some(self.overwrites),
            noplaylist: Some(true),
            cookiefile: self
                .cookie_file
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            http_headers: (!headers.is_empty()).then_some(headers),
            extractor_args,
            quiet: Some(v == Verbosity::Quiet),
            no_warnings: Some(v < Verbosity::Verbose),
            verbose: Some(v >= Verbosity::Verbose),
            debug_printtraffic: Some(v == Verbosity::Traffic),
        }
    }
}

impl From<StreamSelection> for DownloadOptions {
    /// Default settings, no output template.
    fn from(selection: StreamSelection) -> Self {
        ExtractorConfig::default().options(selection, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_selection_picks_best_audio() {
        let opts = ExtractorConfig::default().options(StreamSelection::Audio, Some("/s/a.%(ext)s"));

        assert_eq!(opts.format.as_deref(), Some("bestaudio/best"));
        assert_eq!(
            opts.outtmpl.map(|t| t.0),
            Some(HashMap::from([(
                "default".to_string(),
                "/s/a.%(ext)s".to_string()
            )]))
        );
        assert_eq!(opts.skip_download, None);
    }

    #[test]
    fn video_selection_merges_streams() {
        let opts: DownloadOptions = StreamSelection::Video.into();
        assert_eq!(opts.format.as_deref(), Some("bestvideo+bestaudio/best"));
    }

    #[test]
    fn thumbnail_selection_skips_media() {
        let opts: DownloadOptions = StreamSelection::Thumbnail.into();

        assert!(matches!(
            opts,
            DownloadOptions {
                format: None,
                skip_download: Some(true),
                writethumbnail: Some(true),
                ..
            }
        ));
    }

    #[test]
    fn metadata_selection_has_no_format() {
        let opts: DownloadOptions = StreamSelection::Metadata.into();

        assert!(opts.format.is_none());
        assert!(opts.outtmpl.is_none());
        assert!(opts.writethumbnail.is_none());
    }

    #[test]
    fn quiet_verbosity_flags() {
        let opts: DownloadOptions = StreamSelection::Metadata.into();

        assert!(matches!(
            opts,
            DownloadOptions {
                quiet: Some(true),
                no_warnings: Some(true),
                verbose: Some(false),
                debug_printtraffic: Some(false),
                ..
            }
        ));
    }

    #[test]
    fn traffic_verbosity_flags() {
        let config = ExtractorConfig {
            verbosity: Verbosity::from(7),
            ..Default::default()
        };
        let opts = config.options(StreamSelection::Video, None);

        assert!(matches!(
            opts,
            DownloadOptions {
                quiet: Some(false),
                no_warnings: Some(false),
                verbose: Some(true),
                debug_printtraffic: Some(true),
                ..
            }
        ));
    }

    #[test]
    fn user_agent_and_player_skip_are_configurable() {
        let config = ExtractorConfig {
            user_agent: None,
            player_skip: vec!["js".to_string()],
            cookie_file: Some(PathBuf::from("/tmp/cookies.txt")),
            ..Default::default()
        };
        let opts = config.options(StreamSelection::Audio, None);

        assert!(opts.http_headers.is_none());
        assert_eq!(opts.cookiefile.as_deref(), Some("/tmp/cookies.txt"));

        let args = opts.extractor_args.expect("player_skip set").0;
        assert_eq!(args["youtube"]["player_skip"], vec!["js".to_string()]);
    }

    #[test]
    fn configured_user_agent_replaces_header_entry() {
        let config = ExtractorConfig {
            user_agent: Some("custom/1.0".to_string()),
            http_headers: HashMap::from([
                ("user-agent".to_string(), "other/2.0".to_string()),
                ("Accept-Language".to_string(), "en".to_string()),
            ]),
            ..Default::default()
        };
        let headers = config.request_headers();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers["User-Agent"], "custom/1.0");
        assert_eq!(headers["Accept-Language"], "en");
        assert_eq!(
            config.options(StreamSelection::Audio, None).http_headers,
            Some(headers)
        );
    }

    #[test]
    fn default_sends_desktop_user_agent() {
        let opts: DownloadOptions = StreamSelection::Audio.into();
        let headers = opts.http_headers.expect("default user agent");

        assert_eq!(headers["User-Agent"], DESKTOP_USER_AGENT);
        assert!(opts.extractor_args.is_none());
    }
}
