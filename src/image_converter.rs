//! # Image Conversion Module
//!
//! Questo modulo converte immagini tra formati comprimendo la qualità.
//!
//! ## Responsabilità:
//! - Risolve e normalizza il formato di destinazione (alias `jpg`/`heic`)
//! - Decodifica e ricodifica in-process con il crate `image`
//! - Capability check alpha PRIMA del save: se il formato di destinazione
//!   non supporta la trasparenza, l'immagine viene appiattita a RGB con un
//!   warning (sopprimibile) e salvata una sola volta
//! - Copia metadati best-effort via exiftool se richiesto
//!
//! ## Formati di destinazione supportati:
//! - **JPEG** (con controllo qualità), **PNG**, **WebP**, **BMP**, **GIF**,
//!   **TIFF**
//! - `heif`/`heic` è riconosciuto come token ma non esiste un encoder
//!   in-process: la conversione fallisce con `UnsupportedFormat`
//!
//! ## Qualità:
//! - `image_quality` (0-100) si applica all'encoder lossy (JPEG); gli
//!   encoder lossless la ignorano
//!
//! ## Esempio:
//! ```rust,no_run
//! use fileconvert::{Config, ImageConverter};
//! use std::path::Path;
//!
//! let converter = ImageConverter::new(Config {
//!     image_quality: 40,
//!     keep_metadata: true,
//!     ..Default::default()
//! });
//! converter.convert(Path::new("photo.heic"), Path::new("photo.jpg")).unwrap();
//! ```

use crate::config::Config;
use crate::error::Result;
use crate::format;
use crate::metadata::propagate_metadata;
use crate::size::ConversionReport;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Handles image conversion
pub struct ImageConverter {
    config: Config,
}

impl ImageConverter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Convert an image to the format implied by the output extension.
    ///
    /// The destination extension is validated before the source is even
    /// opened. When the source carries an alpha channel and the target
    /// format forbids one, the image is flattened to RGB and saved once;
    /// any other encode failure propagates unmodified.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<ConversionReport> {
        let format = format::resolve_format(output)?;
        let target = format::image_format(&format)?;

        let image = image::open(input)?;
        debug!(
            "Converting image {} -> {} (format: {}, quality: {})",
            input.display(),
            output.display(),
            format,
            self.config.image_quality
        );

        let image = if image.color().has_alpha() && !format::supports_alpha(&format) {
            if !self.config.suppress_warnings {
                warn!("{format} does not support an alpha channel; transparency is wiped off in order to continue");
            }
            DynamicImage::ImageRgb8(image.to_rgb8())
        } else {
            image
        };

        self.save(&image, output, target)?;

        if self.config.keep_metadata {
            propagate_metadata(input, output, self.config.suppress_warnings);
        }

        let report = ConversionReport::from_paths(input, output)?;
        if self.config.report {
            println!("{report}");
        }
        Ok(report)
    }

    fn save(&self, image: &DynamicImage, output: &Path, format: ImageFormat) -> Result<()> {
        match format {
            ImageFormat::Jpeg => {
                let file = File::create(output)?;
                let mut writer = BufWriter::new(file);
                JpegEncoder::new_with_quality(&mut writer, self.config.image_quality)
                    .encode_image(&image.to_rgb8())?;
                writer.flush()?;
            }
            _ => image.save_with_format(output, format)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use image::{Rgba, RgbaImage};

    fn rgba_fixture(dir: &Path) -> std::path::PathBuf {
        let mut rgba = RgbaImage::new(4, 4);
        for pixel in rgba.pixels_mut() {
            *pixel = Rgba([200, 40, 40, 128]);
        }
        let path = dir.join("source.png");
        DynamicImage::ImageRgba8(rgba).save(&path).unwrap();
        path
    }

    #[test]
    fn test_missing_extension_fails_before_touching_filesystem() {
        let converter = ImageConverter::new(Config::default());
        let err = converter
            .convert(Path::new("/no/such/input.png"), Path::new("/no/such/output"))
            .unwrap_err();
        assert!(matches!(err, ConvertError::MissingExtension(_)));
    }

    #[test]
    fn test_unsupported_target_format() {
        let converter = ImageConverter::new(Config::default());
        let err = converter
            .convert(Path::new("/no/such/input.png"), Path::new("/no/such/output.heif"))
            .unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(f) if f == "heif"));
    }

    #[test]
    fn test_alpha_source_flattens_for_jpeg() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let source = rgba_fixture(temp_dir.path());
        let destination = temp_dir.path().join("converted.jpg");

        let converter = ImageConverter::new(Config {
            suppress_warnings: true,
            ..Default::default()
        });
        let report = converter.convert(&source, &destination).unwrap();

        assert!(destination.exists());
        assert!(report.destination_bytes > 0);
        let written = image::open(&destination).unwrap();
        assert!(!written.color().has_alpha());
    }

    #[test]
    fn test_alpha_preserved_for_png() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let source = rgba_fixture(temp_dir.path());
        let destination = temp_dir.path().join("copy.png");

        let converter = ImageConverter::new(Config::default());
        converter.convert(&source, &destination).unwrap();

        let written = image::open(&destination).unwrap();
        assert!(written.color().has_alpha());
    }

    #[test]
    fn test_quality_affects_jpeg_size() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        // A noisy image so quality actually changes the encoded size
        let mut rgba = RgbaImage::new(64, 64);
        for (x, y, pixel) in rgba.enumerate_pixels_mut() {
            *pixel = Rgba([
                (x * 37 % 251) as u8,
                (y * 83 % 251) as u8,
                ((x + y) * 61 % 251) as u8,
                255,
            ]);
        }
        let source = temp_dir.path().join("noise.png");
        DynamicImage::ImageRgba8(rgba).save(&source).unwrap();

        let high = ImageConverter::new(Config {
            image_quality: 95,
            ..Default::default()
        });
        let low = ImageConverter::new(Config {
            image_quality: 10,
            ..Default::default()
        });

        let high_out = temp_dir.path().join("high.jpg");
        let low_out = temp_dir.path().join("low.jpg");
        let high_report = high.convert(&source, &high_out).unwrap();
        let low_report = low.convert(&source, &low_out).unwrap();

        assert!(low_report.destination_bytes < high_report.destination_bytes);
    }
}
