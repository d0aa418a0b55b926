//! # Video Conversion Module
//!
//! Questo modulo converte file video tra formati regolando risoluzione e
//! bitrate.
//!
//! ## Responsabilità:
//! - Risolve il formato di destinazione dall'estensione del path di output
//! - Delega l'intera transcodifica a un processo `ffmpeg` esterno
//! - Exit code diverso da zero = errore fatale, nessun retry
//! - Rimuove l'output parziale lasciato da una transcodifica fallita
//!
//! ## Parametri consigliati:
//! - Risoluzione: high 1920x1080, mid 1280x720 (default), low 640x480
//! - Bitrate: high 3000k, mid 1000k (default), low 500k
//!
//! ## Esempio:
//! ```rust,no_run
//! use fileconvert::{Config, VideoConverter};
//! use std::path::Path;
//!
//! let converter = VideoConverter::new(Config {
//!     video_resolution: "640x480".to_string(),
//!     video_bitrate: "256k".to_string(),
//!     ..Default::default()
//! });
//! converter.convert(Path::new("input.mov"), Path::new("output.mp4")).unwrap();
//! ```

use crate::config::Config;
use crate::error::Result;
use crate::format::resolve_format;
use crate::size::ConversionReport;
use crate::utils::to_string_vec;
use std::path::Path;
use tracing::debug;

/// Handles video conversion
pub struct VideoConverter {
    config: Config,
}

impl VideoConverter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Argument vector for the ffmpeg invocation: forced overwrite,
    /// explicit resolution and video-bitrate flags, destination last.
    pub fn build_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.display().to_string();
        let output = output.display().to_string();
        to_string_vec([
            "-y",
            "-i",
            input.as_str(),
            "-s",
            self.config.video_resolution.as_str(),
            "-b:v",
            self.config.video_bitrate.as_str(),
            output.as_str(),
        ])
    }

    /// Convert a video file to the format implied by the output extension.
    ///
    /// A non-zero transcoder exit is fatal; the possibly-truncated
    /// destination file is removed before the error propagates.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<ConversionReport> {
        let format = resolve_format(output)?;
        debug!(
            "Converting video {} -> {} (format: {}, resolution: {}, bitrate: {})",
            input.display(),
            output.display(),
            format,
            self.config.video_resolution,
            self.config.video_bitrate
        );

        if let Err(e) = crate::audio_converter::run_ffmpeg(&self.build_args(input, output)) {
            // A failed transcode can leave a truncated destination behind
            let _ = std::fs::remove_file(output);
            return Err(e);
        }

        let report = ConversionReport::from_paths(input, output)?;
        if self.config.report {
            println!("{report}");
        }
        Ok(report)
    }

    /// Check that the external transcoder is available
    pub fn check_dependencies() -> Result<()> {
        crate::audio_converter::ensure_tool("ffmpeg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;

    #[test]
    fn test_build_args() {
        let converter = VideoConverter::new(Config {
            video_resolution: "640x480".to_string(),
            video_bitrate: "256k".to_string(),
            ..Default::default()
        });
        let args = converter.build_args(Path::new("in.mov"), Path::new("out.mp4"));
        assert_eq!(
            args,
            vec!["-y", "-i", "in.mov", "-s", "640x480", "-b:v", "256k", "out.mp4"]
        );
    }

    #[test]
    fn test_missing_extension_fails_before_any_work() {
        let converter = VideoConverter::new(Config::default());
        let err = converter
            .convert(Path::new("/no/such/input.mp4"), Path::new("/no/such/output"))
            .unwrap_err();
        assert!(matches!(err, ConvertError::MissingExtension(_)));
    }
}
