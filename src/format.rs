//! # Format Resolution Module
//!
//! Questo modulo deriva il formato di destinazione dall'estensione del path
//! di output e risponde alle query di capability dei formati immagine.
//!
//! ## Responsabilità:
//! - Estrae e normalizza l'estensione del file di destinazione (lowercase)
//! - Applica la tabella di alias (`jpg` -> `jpeg`, `heic`/`heif` -> `heif`)
//! - Mappa il token di formato sull'encoder del crate `image`
//! - Risponde alla query "il formato supporta un canale alpha?" prima del save
//! - Classifica le estensioni in audio/video/immagine per il batch
//!
//! ## Invarianti:
//! - Operazione puramente stringhe, nessun accesso al filesystem
//! - Un path senza estensione è un errore fatale, mai un default inferito
//! - La normalizzazione è idempotente: `JPG`, `jpg`, `jpeg` -> `jpeg`

use crate::error::{ConvertError, Result};
use image::ImageFormat;
use std::path::Path;

/// Derive the normalized format token from a destination path.
///
/// The token is the lowercased substring after the final `.`, with the
/// alias table applied. A missing (or empty) extension is fatal.
///
/// # Example
/// ```rust
/// use fileconvert::format::resolve_format;
/// use std::path::Path;
///
/// assert_eq!(resolve_format(Path::new("photo.JPG")).unwrap(), "jpeg");
/// assert_eq!(resolve_format(Path::new("photo.heic")).unwrap(), "heif");
/// assert!(resolve_format(Path::new("photo")).is_err());
/// ```
pub fn resolve_format(destination: &Path) -> Result<String> {
    let ext = destination
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ConvertError::MissingExtension(destination.to_path_buf()))?;

    let token = ext.to_lowercase();
    Ok(match token.as_str() {
        "jpg" => "jpeg".to_string(),
        "heic" | "heif" => "heif".to_string(),
        _ => token,
    })
}

/// Whether the encoder for a format token accepts an alpha channel.
///
/// Consulted *before* saving, so the image converter can flatten to RGB
/// once instead of sniffing encoder error messages after a failed save.
pub fn supports_alpha(format: &str) -> bool {
    // Of the encoders this crate enables, only JPEG refuses alpha.
    !matches!(format, "jpeg")
}

/// Map a resolved format token to the `image` crate encoder.
///
/// Tokens without an in-process encoder (e.g. `heif`, which has no
/// registered opener in this ecosystem) are unsupported.
pub fn image_format(format: &str) -> Result<ImageFormat> {
    match format {
        "jpeg" => Ok(ImageFormat::Jpeg),
        "png" => Ok(ImageFormat::Png),
        "webp" => Ok(ImageFormat::WebP),
        "bmp" => Ok(ImageFormat::Bmp),
        "gif" => Ok(ImageFormat::Gif),
        "tiff" | "tif" => Ok(ImageFormat::Tiff),
        other => Err(ConvertError::UnsupportedFormat(other.to_string())),
    }
}

/// Media family of a file extension, used to route batch conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
    Image,
}

/// Classify an extension (without the dot) into a media family
pub fn media_kind(ext: &str) -> Option<MediaKind> {
    let ext = ext.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" | "png" | "webp" | "bmp" | "gif" | "tif" | "tiff" | "heic" | "heif" => {
            Some(MediaKind::Image)
        }
        "mp4" | "mov" | "avi" | "mkv" | "webm" => Some(MediaKind::Video),
        "mp3" | "wav" | "flac" | "ogg" | "m4a" | "aac" | "opus" | "wma" => Some(MediaKind::Audio),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format_lowercases() {
        assert_eq!(resolve_format(Path::new("a.PNG")).unwrap(), "png");
        assert_eq!(resolve_format(Path::new("a.Mp4")).unwrap(), "mp4");
    }

    #[test]
    fn test_resolve_format_alias_idempotent() {
        for name in ["a.JPG", "a.jpg", "a.jpeg"] {
            assert_eq!(resolve_format(Path::new(name)).unwrap(), "jpeg");
        }
        for name in ["a.heic", "a.HEIF", "a.heif"] {
            assert_eq!(resolve_format(Path::new(name)).unwrap(), "heif");
        }
    }

    #[test]
    fn test_resolve_format_missing_extension() {
        for name in ["output", "output.", ".hidden"] {
            let err = resolve_format(Path::new(name)).unwrap_err();
            assert!(matches!(err, ConvertError::MissingExtension(_)), "{name}");
        }
    }

    #[test]
    fn test_supports_alpha() {
        assert!(!supports_alpha("jpeg"));
        assert!(supports_alpha("png"));
        assert!(supports_alpha("webp"));
    }

    #[test]
    fn test_image_format_mapping() {
        assert_eq!(image_format("jpeg").unwrap(), ImageFormat::Jpeg);
        assert_eq!(image_format("tif").unwrap(), ImageFormat::Tiff);
        assert!(matches!(
            image_format("heif").unwrap_err(),
            ConvertError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_media_kind() {
        assert_eq!(media_kind("JPG"), Some(MediaKind::Image));
        assert_eq!(media_kind("mkv"), Some(MediaKind::Video));
        assert_eq!(media_kind("flac"), Some(MediaKind::Audio));
        assert_eq!(media_kind("docx"), None);
    }
}
