//! CLI argument definitions using clap.

use crate::config::Config;
use crate::error::Error;
use crate::helper::YtHelper;
use clap::{ArgAction, Parser, Subcommand};
use color_eyre::Section;
use eyre::{Result, bail};
use std::path::PathBuf;
use yth_media::error::{ConvertError, ToolError};

#[derive(Debug, Parser)]
#[command(name = "yth")]
#[command(about = "Download video, audio and thumbnails from hosted-video URLs")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every subcommand.
#[derive(clap::Args, Debug)]
pub struct GlobalArgs {
    /// Increase verbosity (-v progress, -vv tool debug output, -vvv HTTP traffic)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Netscape-format cookie file passed to yt-dlp
    #[arg(long, global = true)]
    pub cookies: Option<PathBuf>,

    /// User-Agent header sent by yt-dlp (default: a desktop browser)
    #[arg(long, global = true, conflicts_with = "no_user_agent")]
    pub user_agent: Option<String>,

    /// Send yt-dlp's own User-Agent instead of a desktop browser's
    #[arg(long, global = true)]
    pub no_user_agent: bool,

    /// YouTube player clients to skip, comma separated (e.g. js)
    #[arg(long, global = true, value_delimiter = ',')]
    pub player_skip: Vec<String>,

    /// Directory for outputs named after the video title (default: system download directory)
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Append a timestamp to outputs named after the video title
    #[arg(long, global = true)]
    pub timestamp: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that a URL is reachable and yields metadata
    Check { url: String },

    /// Print video metadata
    Meta {
        url: String,

        /// Print the full metadata mapping as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download the thumbnail (PNG unless the output says otherwise)
    Thumbnail(DownloadArgs),

    /// Download the best audio stream (MP3 unless the output says otherwise)
    Audio {
        #[command(flatten)]
        download: DownloadArgs,

        /// Sample rate used when transcoding
        #[arg(long)]
        sample_rate: Option<u32>,
    },

    /// Download the best video with audio (MP4 unless the output says otherwise)
    Video(DownloadArgs),

    /// Download a 240p video muxed with full-quality audio
    BadVideo {
        #[command(flatten)]
        download: DownloadArgs,

        /// Use this audio file instead of downloading one
        #[arg(long)]
        audio: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
pub struct DownloadArgs {
    /// Video URL
    pub url: String,

    /// Output file (default: <output-dir>/<title>.<ext>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute CLI command - separated for testing.
pub fn run_cli(cli: Cli) -> Result<()> {
    tracing::debug!(?cli, "parsed arguments");

    let config = Config::try_from(cli.global)?;
    let helper = YtHelper::new(config).map_err(report)?;

    match cli.command {
        Commands::Check { url } => {
            if !helper.is_valid_video_url(&url) {
                bail!("not a usable video url: {url:?}");
            }
            println!("ok");
        }
        Commands::Meta { url, json } => {
            let info = helper.video_url_meta_data(&url).map_err(report)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("title: {}", info.title);
                if let Some(channel) = info.channel().or(info.uploader()) {
                    println!("channel: {channel}");
                }
                if let Some(duration) = info.duration() {
                    println!("duration: {duration}s");
                }
                println!("description:\n{}", info.description);
            }
        }
        Commands::Thumbnail(DownloadArgs { url, output }) => {
            let path = helper
                .download_thumbnail(&url, output.as_deref())
                .map_err(report)?;
            println!("{}", path.display());
        }
        Commands::Audio {
            download: DownloadArgs { url, output },
            sample_rate,
        } => {
            let path = helper
                .download_audio(&url, output.as_deref(), sample_rate)
                .map_err(report)?;
            println!("{}", path.display());
        }
        Commands::Video(DownloadArgs { url, output }) => {
            let path = helper
                .download_video(&url, output.as_deref())
                .map_err(report)?;
            println!("{}", path.display());
        }
        Commands::BadVideo {
            download: DownloadArgs { url, output },
            audio,
        } => {
            let path = helper
                .download_bad_video_with_good_sound(&url, output.as_deref(), audio.as_deref())
                .map_err(report)?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

/// Attach install hints to errors caused by missing tools.
fn report(err: Error) -> eyre::Report {
    match hint(&err) {
        Some(hint) => eyre::Report::new(err).suggestion(hint),
        None => eyre::Report::new(err),
    }
}

/// Suggestion attached to `err` when reported.
fn hint(err: &Error) -> Option<String> {
    match err {
        Error::Tool(ToolError::NotFound(program))
        | Error::Convert {
            source: ConvertError::Tool(ToolError::NotFound(program)),
            ..
        } => Some(format!("install {program} and make sure it is on PATH")),
        Error::Extract {
            source: yth_dl::Error::Python(_),
            ..
        } => Some("make sure the yt-dlp Python package is installed (pip install yt-dlp)".into()),
        Error::InvalidUrl { .. } => Some("check the URL and your network connection".into()),
        _ => None,
    }
}
