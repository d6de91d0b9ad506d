//! The six public operations.
//!
//! Every download is a stateless pipeline:
//! acquire scratch → run extractor → locate single output → validate →
//! reconcile format → place at destination → release scratch.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fsops;
use crate::naming::{self, MediaKind};
use crate::scratch::ScratchDir;
use chrono::Local;
use std::path::{Path, PathBuf};
use yth_dl::{Extractor, VideoInfo, YtDlp};
use yth_media::error::ConvertError;
use yth_media::ffmpeg::{Ffmpeg, LogLevel};
use yth_media::probe::Ffprobe;
use yth_media::traits::{Transcoder, Validator};
use yth_media::types::VideoConversion;

/// Scratch basename for the composite's audio track.
const COMPOSITE_AUDIO: &str = "composite_audio.mp3";
/// Scratch basename for the composite's full-quality video.
const COMPOSITE_VIDEO: &str = "composite_video.mp4";
/// Scratch basename for the rescaled, silent video.
const COMPOSITE_SILENT: &str = "composite_silent.mp4";

pub struct YtHelper {
    config: Config,
    extractor: Box<dyn Extractor>,
    transcoder: Box<dyn Transcoder>,
    validator: Box<dyn Validator>,
}

impl std::fmt::Debug for YtHelper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YtHelper")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl YtHelper {
    /// yt-dlp, ffmpeg and ffprobe; the binaries must be on `PATH`.
    pub fn new(config: Config) -> Result<Self> {
        let ffmpeg = Ffmpeg::locate(LogLevel::from_verbosity(config.verbosity_level()))?;
        let ffprobe = Ffprobe::locate()?;
        let ytdlp = YtDlp::new(config.extractor.clone());

        Ok(Self::with_backends(
            config,
            Box::new(ytdlp),
            Box::new(ffmpeg),
            Box::new(ffprobe),
        ))
    }

    pub fn with_backends(
        config: Config,
        extractor: Box<dyn Extractor>,
        transcoder: Box<dyn Transcoder>,
        validator: Box<dyn Validator>,
    ) -> Self {
        Self {
            config,
            extractor,
            transcoder,
            validator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Non-empty, reachable, and extractable. Never fails; the failing check is logged.
    pub fn is_valid_video_url(&self, url: &str) -> bool {
        if url.trim().is_empty() {
            tracing::warn!("video url is empty");
            return false;
        }

        if !self.extractor.is_reachable(url) {
            tracing::warn!(url, "video url is not reachable");
            return false;
        }

        match self.extractor.extract_info(url) {
            Ok(Some(_)) => {
                tracing::info!(url, "metadata extraction succeeded");
                true
            }
            Ok(None) => {
                tracing::warn!(url, "metadata extraction returned nothing");
                false
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "metadata extraction failed");
                false
            }
        }
    }

    /// Metadata without downloading media. `title` and `description` are always set.
    pub fn video_url_meta_data(&self, url: &str) -> Result<VideoInfo> {
        self.require_reachable(url)?;

        let info = self
            .extractor
            .extract_info(url)
            .map_err(|source| Error::Extract {
                url: url.to_string(),
                source,
            })?
            .ok_or_else(|| Error::NoMetadata {
                url: url.to_string(),
            })?;

        tracing::info!(title = %info.title, "video title");
        tracing::info!(description = %info.description_head(3), "video description");

        Ok(info)
    }

    pub fn download_thumbnail(&self, url: &str, dest: Option<&Path>) -> Result<PathBuf> {
        let kind = MediaKind::Thumbnail;
        let dest = self.destination(url, dest, kind)?;

        if dest.is_file() {
            tracing::info!(dest = ?dest.display(), "thumbnail already present");
            return Ok(dest);
        }

        tracing::info!(url, dest = ?dest.display(), "downloading thumbnail");
        let scratch = scratch()?;
        let received = self.fetch(url, kind, &dest, &scratch)?;

        let staged = self.reconcile(url, kind, &received, &dest, &scratch, |input, output| {
            self.transcoder.convert_image(input, output)
        })?;
        if let Err(e) = yth_media::imaging::image_dimensions(&staged) {
            tracing::debug!(error = %e, "thumbnail does not decode");
            return Err(Error::Invalid {
                url: url.to_string(),
                kind,
                path: staged,
                dest,
            });
        }

        place(&staged, &dest)?;
        tracing::info!(dest = ?dest.display(), "thumbnail saved");
        Ok(dest)
    }

    /// `sample_rate` defaults to [`Config::sample_rate`] and only applies when transcoding.
    pub fn download_audio(
        &self,
        url: &str,
        dest: Option<&Path>,
        sample_rate: Option<u32>,
    ) -> Result<PathBuf> {
        let kind = MediaKind::Audio;
        let dest = self.destination(url, dest, kind)?;

        if self.validator.is_valid_audio_file(&dest) {
            tracing::info!(dest = ?dest.display(), "valid audio already present");
            return Ok(dest);
        }
        self.require_reachable(url)?;

        tracing::info!(url, dest = ?dest.display(), "downloading audio");
        let scratch = scratch()?;
        let received = self.fetch(url, kind, &dest, &scratch)?;
        self.ensure_valid(url, kind, &received, &dest)?;

        let sample_rate = sample_rate.unwrap_or(self.config.sample_rate);
        let staged = self.reconcile(url, kind, &received, &dest, &scratch, |input, output| {
            self.transcoder.convert_audio(input, output, sample_rate)
        })?;
        self.ensure_valid(url, kind, &staged, &dest)?;

        place(&staged, &dest)?;
        tracing::info!(dest = ?dest.display(), "audio saved");
        Ok(dest)
    }

    pub fn download_video(&self, url: &str, dest: Option<&Path>) -> Result<PathBuf> {
        let kind = MediaKind::Video;
        let dest = self.destination(url, dest, kind)?;

        if self.validator.is_valid_video_file(&dest) {
            tracing::info!(dest = ?dest.display(), "valid video already present");
            return Ok(dest);
        }
        self.require_reachable(url)?;

        tracing::info!(url, dest = ?dest.display(), "downloading video");
        let scratch = scratch()?;
        let received = self.fetch(url, kind, &dest, &scratch)?;
        self.ensure_valid(url, kind, &received, &dest)?;

        let conv = VideoConversion::default();
        let staged = self.reconcile(url, kind, &received, &dest, &scratch, |input, output| {
            self.transcoder.convert_video(input, output, &conv)
        })?;
        self.ensure_valid(url, kind, &staged, &dest)?;

        place(&staged, &dest)?;
        tracing::info!(dest = ?dest.display(), "video saved");
        Ok(dest)
    }

    /// Low-resolution silent video muxed with best-quality audio.
    ///
    /// `audio` replaces the downloaded track; non-MP3 input is converted to MP3 first.
    pub fn download_bad_video_with_good_sound(
        &self,
        url: &str,
        dest: Option<&Path>,
        audio: Option<&Path>,
    ) -> Result<PathBuf> {
        let kind = MediaKind::Video;
        let height = self.config.composite_height;
        let dest = self.destination_with(url, dest, kind, |title| {
            naming::composite_title(&title, height)
        })?;

        if self.is_finished_composite(&dest) {
            tracing::info!(dest = ?dest.display(), "composite video already present");
            return Ok(dest);
        }

        tracing::info!(
            url,
            dest = ?dest.display(),
            "downloading low-resolution video with full-quality sound"
        );
        let scratch = scratch()?;

        let audio = match audio {
            None => self.download_audio(url, Some(&scratch.join(COMPOSITE_AUDIO)), None)?,
            Some(supplied) => self.prepare_supplied_audio(url, supplied, &dest, &scratch)?,
        };

        let video = self.download_video(url, Some(&scratch.join(COMPOSITE_VIDEO)))?;

        let silent = scratch.join(COMPOSITE_SILENT);
        let conv = VideoConversion {
            height: Some(height),
            without_sound: true,
        };
        tracing::info!(height, "rescaling video");
        self.transcoder
            .convert_video(&video, &silent, &conv)
            .map_err(convert_error(url, kind, &dest))?;

        let ext = naming::extension_of(&dest).unwrap_or_else(|| kind.default_extension().into());
        let muxed = scratch.join(format!("composite_muxed.{ext}"));
        tracing::info!("muxing video and audio");
        self.transcoder
            .mux(&silent, &audio, &muxed)
            .map_err(convert_error(url, kind, &dest))?;

        let dims = self
            .validator
            .video_dimensions(&muxed)
            .map_err(|source| Error::Probe {
                url: url.to_string(),
                path: dest.clone(),
                source,
            })?;
        if !dims.is_valid() {
            return Err(Error::Invalid {
                url: url.to_string(),
                kind,
                path: muxed,
                dest,
            });
        }
        if !dims.has_sound {
            return Err(Error::MissingAudioTrack {
                url: url.to_string(),
                path: dest,
            });
        }

        place(&muxed, &dest)?;
        tracing::info!(
            dest = ?dest.display(),
            width = dims.width,
            height = dims.height,
            "composite video saved"
        );
        Ok(dest)
    }

    /// Whether `dest` already holds a composite at the configured height with sound.
    fn is_finished_composite(&self, dest: &Path) -> bool {
        match self.validator.video_dimensions(dest) {
            Ok(dims) => {
                dims.is_valid() && dims.height == self.config.composite_height && dims.has_sound
            }
            Err(e) => {
                tracing::debug!(dest = ?dest.display(), error = %e, "no composite at destination");
                false
            }
        }
    }

    fn prepare_supplied_audio(
        &self,
        url: &str,
        supplied: &Path,
        dest: &Path,
        scratch: &ScratchDir,
    ) -> Result<PathBuf> {
        let kind = MediaKind::Audio;
        self.ensure_valid(url, kind, supplied, dest)?;

        if naming::extension_of(supplied).as_deref() == Some("mp3") {
            return Ok(supplied.to_path_buf());
        }

        let mp3 = scratch.join(COMPOSITE_AUDIO);
        tracing::info!(audio = ?supplied.display(), "converting supplied audio to mp3");
        self.transcoder
            .convert_audio(supplied, &mp3, self.config.sample_rate)
            .map_err(convert_error(url, kind, &mp3))?;

        Ok(mp3)
    }

    /// Absolute destination, explicit or derived from the video title.
    fn destination(&self, url: &str, dest: Option<&Path>, kind: MediaKind) -> Result<PathBuf> {
        self.destination_with(url, dest, kind, |title| title)
    }

    /// Like [`Self::destination`], with `stem` applied to the sanitized title.
    fn destination_with(
        &self,
        url: &str,
        dest: Option<&Path>,
        kind: MediaKind,
        stem: impl FnOnce(String) -> String,
    ) -> Result<PathBuf> {
        let path = match dest {
            Some(path) => naming::explicit_destination(path, kind)
                .map_err(Error::io("failed to resolve", path))?,
            None => {
                let info = self.video_url_meta_data(url)?;
                let safe_title = stem(self.extractor.safe_filename(&info.title));
                let timestamp = self.config.timestamp_names.then(Local::now);
                naming::derived_destination(&self.config.output_dir, &safe_title, kind, timestamp)
            }
        };

        tracing::debug!(%kind, dest = ?path.display(), "resolved destination");
        Ok(path)
    }

    fn require_reachable(&self, url: &str) -> Result<()> {
        if url.trim().is_empty() || !self.extractor.is_reachable(url) {
            return Err(Error::InvalidUrl {
                url: url.to_string(),
            });
        }
        Ok(())
    }

    /// Run the extractor into `scratch` and return the single produced file.
    fn fetch(
        &self,
        url: &str,
        kind: MediaKind,
        dest: &Path,
        scratch: &ScratchDir,
    ) -> Result<PathBuf> {
        let basename = kind.as_str();

        self.extractor
            .download(url, kind.selection(), &scratch.template(basename))
            .map_err(|source| Error::Extract {
                url: url.to_string(),
                source,
            })?;

        let received = scratch.locate(basename).map_err(|source| Error::Output {
            url: url.to_string(),
            kind,
            dest: dest.to_path_buf(),
            source,
        })?;

        tracing::debug!(received = ?received.display(), "extractor output");
        Ok(received)
    }

    /// The file to place at `dest`: `received` itself when the formats agree,
    /// otherwise a converted copy inside `scratch`.
    fn reconcile(
        &self,
        url: &str,
        kind: MediaKind,
        received: &Path,
        dest: &Path,
        scratch: &ScratchDir,
        convert: impl FnOnce(&Path, &Path) -> std::result::Result<(), ConvertError>,
    ) -> Result<PathBuf> {
        let have = naming::extension_of(received).unwrap_or_default();
        let want = naming::extension_of(dest).unwrap_or_else(|| kind.default_extension().into());

        if naming::same_extension(kind, &have, &want) {
            tracing::debug!(ext = %have, "formats match, copying verbatim");
            return Ok(received.to_path_buf());
        }

        tracing::info!(from = %have, to = %want, "converting {kind}");
        let converted = scratch.join(format!("converted.{want}"));
        convert(received, &converted).map_err(convert_error(url, kind, dest))?;

        Ok(converted)
    }

    /// `path` passes the validator for `kind`; errors name both `path` and `dest`.
    fn ensure_valid(&self, url: &str, kind: MediaKind, path: &Path, dest: &Path) -> Result<()> {
        let valid = match kind {
            MediaKind::Audio => self.validator.is_valid_audio_file(path),
            MediaKind::Video => self.validator.is_valid_video_file(path),
            MediaKind::Thumbnail => path.is_file(),
        };

        if valid {
            Ok(())
        } else {
            Err(Error::Invalid {
                url: url.to_string(),
                kind,
                path: path.to_path_buf(),
                dest: dest.to_path_buf(),
            })
        }
    }
}

fn scratch() -> Result<ScratchDir> {
    ScratchDir::new().map_err(Error::io(
        "failed to create scratch directory in",
        std::env::temp_dir(),
    ))
}

fn place(staged: &Path, dest: &Path) -> Result<()> {
    fsops::place_file(staged, dest).map_err(Error::io("failed to write", dest))
}

fn convert_error(url: &str, kind: MediaKind, dest: &Path) -> impl FnOnce(ConvertError) -> Error {
    let url = url.to_string();
    let dest = dest.to_path_buf();
    move |source| Error::Convert {
        url,
        kind,
        dest,
        source,
    }
}
