//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce l'enum `ConvertError` per categorizzare tutti gli errori possibili
//! - Integra con `thiserror` per automatic error conversion
//! - Propaga gli errori fatali al chiamante senza wrapping né retry
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (file non trovati, permessi, etc.)
//! - `Image`: Errori di decodifica/codifica immagini
//! - `Ffmpeg`: Errori del processo esterno di transcodifica
//! - `MissingExtension`: Path di destinazione senza estensione
//! - `UnsupportedFormat`: Formato non supportato da converter o extractor
//! - `MissingDependency`: Tool esterno mancante (ffmpeg)
//! - `Archive`: Errori di lettura dell'archivio OOXML
//! - `DocumentXml`: Errori di parsing XML del documento
//! - `Pdf`: Errori del parser PDF
//!
//! ## Esempio:
//! ```rust
//! use fileconvert::ConvertError;
//!
//! fn check(tool_exists: bool) -> Result<(), ConvertError> {
//!     if !tool_exists {
//!         return Err(ConvertError::MissingDependency("ffmpeg".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

/// Custom error types for conversion and extraction
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    #[error("Output file must have an extension to determine the format: {0:?}")]
    MissingExtension(std::path::PathBuf),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Dependency missing: {0}")]
    MissingDependency(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Document XML error: {0}")]
    DocumentXml(#[from] quick_xml::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, ConvertError>;
