//! # Fileconvert Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom per le diverse operazioni
//! - `format`: Risoluzione formato dall'estensione e capability query
//! - `size`: Formattazione dimensioni e report di conversione
//! - `audio_converter` / `video_converter`: Conversione via ffmpeg
//! - `image_converter`: Conversione immagini in-process
//! - `metadata`: Copia metadati best-effort via exiftool
//! - `extract`: Estrazione testo/immagini da .docx e PDF
//! - `paths`: Discovery ricorsiva e sostituzione estensioni
//! - `platform`: Comandi esterni cross-platform
//!
//! ## Utilizzo:
//! ```rust,no_run
//! use fileconvert::{Config, ImageConverter};
//! use std::path::Path;
//!
//! let config = Config { image_quality: 40, report: true, ..Default::default() };
//! let converter = ImageConverter::new(config);
//! converter.convert(Path::new("photo.heic"), Path::new("photo.jpg")).unwrap();
//! ```

pub mod audio_converter;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod image_converter;
pub mod metadata;
pub mod paths;
pub mod platform;
pub mod size;
pub mod utils;
pub mod video_converter;

pub use audio_converter::AudioConverter;
pub use config::Config;
pub use error::{ConvertError, Result};
pub use extract::{
    extract_images_from_document, extract_images_from_pdf, extract_text_from_document,
    extract_text_from_pdf,
};
pub use image_converter::ImageConverter;
pub use size::ConversionReport;
pub use video_converter::VideoConverter;
