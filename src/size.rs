//! # Size Reporting Module
//!
//! Formattazione human-readable delle dimensioni e report di conversione
//! (dimensione prima/dopo, percentuale rispetto all'originale).
//!
//! Il report è puramente informativo: viene calcolato solo dopo che il file
//! di destinazione esiste e non influenza mai il flusso di conversione.

use crate::error::Result;
use std::fmt;
use std::path::{Path, PathBuf};

const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];

/// Format a byte count as a human-readable string.
///
/// Scales by 1024 per unit step up to PB, with two decimals. Zero bytes
/// is the special case `"0B"`, no scaling and no space.
///
/// # Example
/// ```rust
/// use fileconvert::size::human_size;
///
/// assert_eq!(human_size(0), "0B");
/// assert_eq!(human_size(1536), "1.50 KB");
/// assert_eq!(human_size(1_048_576), "1.00 MB");
/// ```
pub fn human_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Read a file's size and return it as `(human_string, byte_count)`
pub fn file_size(path: &Path) -> Result<(String, u64)> {
    let bytes = std::fs::metadata(path)?.len();
    Ok((human_size(bytes), bytes))
}

/// Before/after size comparison for a completed conversion
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub source_bytes: u64,
    pub destination_bytes: u64,
}

impl ConversionReport {
    /// Build a report by reading both files' sizes from the filesystem.
    ///
    /// The destination must already exist on durable storage.
    pub fn from_paths(source: &Path, destination: &Path) -> Result<Self> {
        let (_, source_bytes) = file_size(source)?;
        let (_, destination_bytes) = file_size(destination)?;
        Ok(Self {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            source_bytes,
            destination_bytes,
        })
    }

    /// Destination size as a percentage of the source size.
    ///
    /// `None` when the source is zero bytes: there is no meaningful ratio
    /// and the report renders `n/a` instead of dividing by zero.
    pub fn ratio(&self) -> Option<f64> {
        if self.source_bytes == 0 {
            return None;
        }
        Some(self.destination_bytes as f64 / self.source_bytes as f64 * 100.0)
    }

    /// JSON form of the report for programmatic consumers
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "source": self.source,
            "destination": self.destination,
            "source_bytes": self.source_bytes,
            "destination_bytes": self.destination_bytes,
            "source_size": human_size(self.source_bytes),
            "destination_size": human_size(self.destination_bytes),
            "ratio_percent": self.ratio(),
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ratio = match self.ratio() {
            Some(r) => format!("{r:.2}%"),
            None => "n/a".to_string(),
        };
        write!(
            f,
            "\"{}\" ({}) -> \"{}\" ({}), {} of original size.",
            file_name(&self.source),
            human_size(self.source_bytes),
            file_name(&self.destination),
            human_size(self.destination_bytes),
            ratio
        )
    }
}
