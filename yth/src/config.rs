//! Configuration for the orchestration layer.
//!
//! [`Config`] is passed into [`crate::YtHelper`] explicitly; nothing is read
//! from process-wide state during a call. The `TryFrom<GlobalArgs>`
//! implementation resolves CLI flags; the args struct itself stays in cli.rs.

use crate::cli::GlobalArgs;
use eyre::{Result, bail};
use std::path::PathBuf;
use yth_dl::options::{ExtractorConfig, Verbosity};

/// Target sample rate for transcoded audio.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Height of the low-resolution video in the composite.
pub const DEFAULT_COMPOSITE_HEIGHT: u32 = 240;

#[derive(Clone, Debug)]
pub struct Config {
    pub extractor: ExtractorConfig,
    pub sample_rate: u32,
    pub composite_height: u32,
    /// Directory for destinations derived from the title
    pub output_dir: PathBuf,
    /// Append a timestamp to derived names
    pub timestamp_names: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extractor: ExtractorConfig::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            composite_height: DEFAULT_COMPOSITE_HEIGHT,
            output_dir: default_output_dir(),
            timestamp_names: false,
        }
    }
}

impl Config {
    /// Verbosity as the numeric level shared with the ffmpeg log level mapping.
    pub fn verbosity_level(&self) -> u8 {
        self.extractor.verbosity as u8
    }
}

/// System download directory, else the working directory.
pub fn default_output_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl TryFrom<GlobalArgs> for Config {
    type Error = eyre::Error;

    fn try_from(args: GlobalArgs) -> Result<Self> {
        if let Some(cookies) = &args.cookies
            && !cookies.is_file()
        {
            bail!("cookie file not found: {:?}", cookies.display());
        }

        let mut extractor = ExtractorConfig {
            verbosity: Verbosity::from(args.verbose),
            player_skip: args.player_skip,
            cookie_file: args.cookies,
            ..ExtractorConfig::default()
        };

        if args.no_user_agent {
            extractor.user_agent = None;
        } else if let Some(ua) = args.user_agent {
            extractor.user_agent = Some(ua);
        }

        Ok(Self {
            extractor,
            output_dir: args.output_dir.unwrap_or_else(default_output_dir),
            timestamp_names: args.timestamp,
            ..Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yth_dl::options::DESKTOP_USER_AGENT;

    fn args() -> GlobalArgs {
        GlobalArgs {
            verbose: 0,
            cookies: None,
            user_agent: None,
            no_user_agent: false,
            player_skip: Vec::new(),
            output_dir: None,
            timestamp: false,
        }
    }

    #[test]
    fn defaults() {
        let config = Config::try_from(args()).unwrap();

        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.composite_height, 240);
        assert_eq!(config.extractor.verbosity, Verbosity::Quiet);
        assert_eq!(
            config.extractor.user_agent.as_deref(),
            Some(DESKTOP_USER_AGENT)
        );
        assert!(config.extractor.player_skip.is_empty());
        assert!(!config.timestamp_names);
    }

    #[test]
    fn flags_map_through() {
        let config = Config::try_from(GlobalArgs {
            verbose: 2,
            user_agent: Some("custom/1.0".into()),
            player_skip: vec!["js".into()],
            output_dir: Some("/media/out".into()),
            timestamp: true,
            ..args()
        })
        .unwrap();

        assert_eq!(config.extractor.verbosity, Verbosity::Verbose);
        assert_eq!(config.verbosity_level(), 2);
        assert_eq!(config.extractor.user_agent.as_deref(), Some("custom/1.0"));
        assert_eq!(config.extractor.player_skip, ["js"]);
        assert_eq!(config.output_dir, PathBuf::from("/media/out"));
        assert!(config.timestamp_names);
    }

    #[test]
    fn user_agent_can_be_removed() {
        let config = Config::try_from(GlobalArgs {
            no_user_agent: true,
            ..args()
        })
        .unwrap();
        assert!(config.extractor.user_agent.is_none());
    }

    #[test]
    fn missing_cookie_file_rejected() {
        let err = Config::try_from(GlobalArgs {
            cookies: Some("/definitely/not/here/cookies.txt".into()),
            ..args()
        })
        .unwrap_err();
        assert!(err.to_string().contains("cookie file not found"));
    }

    #[test]
    fn existing_cookie_file_accepted() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = Config::try_from(GlobalArgs {
            cookies: Some(file.path().to_path_buf()),
            ..args()
        })
        .unwrap();
        assert_eq!(config.extractor.cookie_file.as_deref(), Some(file.path()));
    }
}
