//! # Extraction Pipeline
//!
//! Estrazione di testo e immagini da documenti text-based (.docx) e PDF.
//!
//! ## Moduli:
//! - `document`: paragrafi e media embedded di file OOXML (.docx)
//! - `pdf`: testo per pagina e immagini XObject di file PDF
//!
//! L'estensione dell'input viene validata prima di aprire il file; i
//! risultati sono interamente posseduti dal chiamante e nessun handle sul
//! file sorgente sopravvive alla chiamata.

pub mod document;
pub mod pdf;

pub use document::{extract_images_from_document, extract_text_from_document};
pub use pdf::{extract_images_from_pdf, extract_text_from_pdf};
