//! # Metadata Propagation Module
//!
//! Copia best-effort dei metadati (EXIF, GPS, parametri camera) dal file
//! sorgente alla destinazione tramite `exiftool`.
//!
//! Questo passo è esplicitamente side-channel: un exiftool mancante o un
//! suo fallimento produce al più un warning e non invalida mai la
//! conversione già completata.

use crate::platform::PlatformCommands;
use crate::utils::to_string_vec;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Argument vector for the exiftool invocation
pub fn exiftool_args(source: &Path, destination: &Path) -> Vec<String> {
    to_string_vec([
        "-overwrite_original".to_string(),
        format!("-TagsFromFile={}", source.display()),
        destination.display().to_string(),
    ])
}

/// Copy all tags from `source` into `destination`, overwriting in place.
///
/// Never raises: a missing tool and a failing tool are both downgraded to
/// a warning (suppressed when `suppress_warnings` is set).
pub fn propagate_metadata(source: &Path, destination: &Path, suppress_warnings: bool) {
    debug!("Copying metadata from {}", source.display());

    let platform = PlatformCommands::instance();
    let exiftool_cmd = platform.get_command("exiftool");

    match Command::new(exiftool_cmd)
        .args(exiftool_args(source, destination))
        .output()
    {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if !suppress_warnings {
                warn!("exiftool is not installed or not in PATH. Metadata will not be copied.");
            }
        }
        Err(e) => {
            if !suppress_warnings {
                warn!("Failed to run exiftool: {e}");
            }
        }
        Ok(output) if !output.status.success() => {
            if !suppress_warnings {
                warn!(
                    "exiftool failed to copy metadata for {}: {}",
                    source.display(),
                    String::from_utf8_lossy(&output.stderr).trim()
                );
            }
        }
        Ok(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exiftool_args() {
        let args = exiftool_args(Path::new("in.heic"), Path::new("out.jpg"));
        assert_eq!(
            args,
            vec![
                "-overwrite_original".to_string(),
                "-TagsFromFile=in.heic".to_string(),
                "out.jpg".to_string(),
            ]
        );
    }
}
