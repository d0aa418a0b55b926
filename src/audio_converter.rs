//! # Audio Conversion Module
//!
//! Questo modulo converte file audio tra formati regolando il bitrate.
//!
//! ## Responsabilità:
//! - Risolve il formato di destinazione dall'estensione del path di output
//! - Delega decodifica e ricodifica a un processo `ffmpeg`
//! - Propaga i fallimenti del converter senza fallback né retry
//! - Report dimensioni prima/dopo se richiesto dalla configurazione
//!
//! ## Bitrate consigliati:
//! - Alta qualità: 256k
//! - Media qualità: 160k (default)
//! - Bassa qualità: 96k
//!
//! ## Esempio:
//! ```rust,no_run
//! use fileconvert::{AudioConverter, Config};
//! use std::path::Path;
//!
//! let converter = AudioConverter::new(Config {
//!     audio_bitrate: "32k".to_string(),
//!     ..Default::default()
//! });
//! converter.convert(Path::new("input.wav"), Path::new("output.mp3")).unwrap();
//! ```

use crate::config::Config;
use crate::error::{ConvertError, Result};
use crate::format::resolve_format;
use crate::platform::PlatformCommands;
use crate::size::ConversionReport;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Handles audio conversion
pub struct AudioConverter {
    config: Config,
}

impl AudioConverter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Argument vector for the ffmpeg invocation.
    ///
    /// `-vn` drops video streams (e.g. embedded cover art) so the output
    /// container only carries audio; the container itself is chosen by
    /// ffmpeg from the destination extension.
    pub fn build_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.display().to_string();
        let output = output.display().to_string();
        crate::args![
            "-y",
            "-i",
            input.as_str(),
            "-vn",
            "-b:a",
            self.config.audio_bitrate.as_str(),
            output.as_str()
        ]
    }

    /// Convert an audio file to the format implied by the output extension.
    ///
    /// The destination extension is validated before any filesystem or
    /// subprocess work. Converter failures propagate unmodified.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<ConversionReport> {
        let format = resolve_format(output)?;
        debug!(
            "Converting audio {} -> {} (format: {}, bitrate: {})",
            input.display(),
            output.display(),
            format,
            self.config.audio_bitrate
        );

        run_ffmpeg(&self.build_args(input, output))?;

        let report = ConversionReport::from_paths(input, output)?;
        if self.config.report {
            println!("{report}");
        }
        Ok(report)
    }

    /// Check that the external converter is available
    pub fn check_dependencies() -> Result<()> {
        ensure_tool("ffmpeg")
    }
}

/// Run ffmpeg with the given argument vector, capturing stderr for errors
pub(crate) fn run_ffmpeg(args: &[String]) -> Result<()> {
    let platform = PlatformCommands::instance();
    let ffmpeg_cmd = platform.get_command("ffmpeg");

    let output = Command::new(ffmpeg_cmd).args(args).output().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ConvertError::MissingDependency("ffmpeg".to_string())
        } else {
            ConvertError::Io(e)
        }
    })?;

    if !output.status.success() {
        return Err(ConvertError::Ffmpeg(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ));
    }

    Ok(())
}

/// Fail with `MissingDependency` when `tool` is not on the system
pub(crate) fn ensure_tool(tool: &str) -> Result<()> {
    if !PlatformCommands::instance().is_command_available(tool) {
        return Err(ConvertError::MissingDependency(format!(
            "{tool} is required for media conversion"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let converter = AudioConverter::new(Config {
            audio_bitrate: "32k".to_string(),
            ..Default::default()
        });
        let args = converter.build_args(Path::new("in.wav"), Path::new("out.mp3"));
        assert_eq!(args, vec!["-y", "-i", "in.wav", "-vn", "-b:a", "32k", "out.mp3"]);
    }

    #[test]
    fn test_missing_extension_fails_before_any_work() {
        let converter = AudioConverter::new(Config::default());
        // Neither path exists; the extension check must fire first
        let err = converter
            .convert(Path::new("/no/such/input.wav"), Path::new("/no/such/output"))
            .unwrap_err();
        assert!(matches!(err, ConvertError::MissingExtension(_)));
    }
}
