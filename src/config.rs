//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con i parametri di conversione
//! - Fornisce validazione dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `audio_bitrate`: Bitrate audio (default: "160k"; high 256k, low 96k)
//! - `video_resolution`: Risoluzione video "WxH" (default: "1280x720")
//! - `video_bitrate`: Bitrate video (default: "1000k"; high 3000k, low 500k)
//! - `image_quality`: Qualità immagine 0-100 (default: 85)
//! - `keep_metadata`: Copia i metadati con exiftool dopo la conversione
//! - `suppress_warnings`: Sopprime i warning best-effort
//! - `report`: Stampa il report dimensioni dopo ogni conversione
//!
//! ## Esempio:
//! ```rust
//! use fileconvert::Config;
//!
//! let config = Config {
//!     image_quality: 40,
//!     report: true,
//!     ..Default::default()
//! };
//! config.validate().unwrap();
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for media conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Audio bitrate (e.g. "160k")
    pub audio_bitrate: String,
    /// Video resolution as "WxH" (e.g. "1280x720")
    pub video_resolution: String,
    /// Video bitrate (e.g. "1000k")
    pub video_bitrate: String,
    /// Image quality (0-100)
    pub image_quality: u8,
    /// Copy metadata from source to destination after image conversion
    pub keep_metadata: bool,
    /// Suppress best-effort warnings (metadata tool, alpha flattening)
    pub suppress_warnings: bool,
    /// Print a size report after each conversion
    pub report: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audio_bitrate: "160k".to_string(),
            video_resolution: "1280x720".to_string(),
            video_bitrate: "1000k".to_string(),
            image_quality: 85,
            keep_metadata: false,
            suppress_warnings: false,
            report: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.image_quality > 100 {
            return Err(anyhow::anyhow!("Image quality must be between 0 and 100"));
        }

        if !is_resolution(&self.video_resolution) {
            return Err(anyhow::anyhow!(
                "Video resolution must have the form WxH, e.g. 1280x720: {}",
                self.video_resolution
            ));
        }

        if !is_bitrate(&self.audio_bitrate) {
            return Err(anyhow::anyhow!(
                "Audio bitrate must be a number with an optional k/M suffix: {}",
                self.audio_bitrate
            ));
        }

        if !is_bitrate(&self.video_bitrate) {
            return Err(anyhow::anyhow!(
                "Video bitrate must be a number with an optional k/M suffix: {}",
                self.video_bitrate
            ));
        }

        Ok(())
    }

    /// Load configuration from a JSON file, falling back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn is_resolution(value: &str) -> bool {
    match value.split_once('x') {
        Some((w, h)) => {
            w.parse::<u32>().map(|n| n > 0).unwrap_or(false)
                && h.parse::<u32>().map(|n| n > 0).unwrap_or(false)
        }
        None => false,
    }
}

fn is_bitrate(value: &str) -> bool {
    let digits = value
        .strip_suffix(|c: char| matches!(c, 'k' | 'K' | 'm' | 'M'))
        .unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.audio_bitrate, "160k");
        assert_eq!(config.video_resolution, "1280x720");
        assert_eq!(config.video_bitrate, "1000k");
        assert_eq!(config.image_quality, 85);
        assert!(!config.keep_metadata);
        assert!(!config.report);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.image_quality = 101;
        assert!(config.validate().is_err());

        config.image_quality = 85;
        config.video_resolution = "1280".to_string();
        assert!(config.validate().is_err());

        config.video_resolution = "640x480".to_string();
        config.audio_bitrate = "fast".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bitrate_forms() {
        assert!(is_bitrate("160k"));
        assert!(is_bitrate("3M"));
        assert!(is_bitrate("800000"));
        assert!(!is_bitrate(""));
        assert!(!is_bitrate("k"));
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original = Config {
            audio_bitrate: "32k".to_string(),
            video_resolution: "640x480".to_string(),
            video_bitrate: "256k".to_string(),
            image_quality: 40,
            keep_metadata: true,
            suppress_warnings: false,
            report: true,
        };

        original.save_to_file(&config_path).unwrap();
        let loaded = Config::from_file(&config_path).unwrap();

        assert_eq!(loaded.audio_bitrate, "32k");
        assert_eq!(loaded.video_resolution, "640x480");
        assert_eq!(loaded.image_quality, 40);
        assert!(loaded.keep_metadata);
        assert!(loaded.report);
    }

    #[test]
    fn test_config_missing_file_is_default() {
        let loaded = Config::from_file(Path::new("/no/such/config.json")).unwrap();
        assert_eq!(loaded.image_quality, Config::default().image_quality);
    }
}
