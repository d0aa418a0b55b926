//! # Document Extraction Module
//!
//! Estrazione da file .docx (OOXML): testo dei paragrafi e immagini
//! embedded.
//!
//! Un .docx è un archivio zip: il testo vive in `word/document.xml`
//! (paragrafi `<w:p>`, run di testo `<w:t>`), le immagini sotto
//! `word/media/`. Il parsing XML legge solo questi due tipi di tag; tutto
//! il resto del markup viene ignorato.

use crate::error::{ConvertError, Result};
use image::DynamicImage;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

const MEDIA_PREFIX: &str = "word/media/";
const RASTER_SUFFIXES: &[&str] = &[".png", ".jpeg", ".jpg", ".bmp", ".gif"];

fn ensure_docx(input: &Path) -> Result<()> {
    match input.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("docx") => Ok(()),
        _ => Err(ConvertError::UnsupportedFormat(
            "only .docx documents are supported (not .doc)".to_string(),
        )),
    }
}

/// Extract the paragraph text of a .docx file, optionally writing it to
/// `output` as UTF-8.
///
/// Paragraphs are joined with `"\n"`; an empty paragraph contributes an
/// empty line. A non-`.docx` input extension is fatal.
pub fn extract_text_from_document(input: &Path, output: Option<&Path>) -> Result<String> {
    ensure_docx(input)?;

    let file = File::open(input)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut document_xml)?;

    let text = parse_paragraphs(&document_xml)?.join("\n");

    if let Some(path) = output {
        std::fs::write(path, &text)?;
    }
    Ok(text)
}

/// Collect paragraph texts from the main document part, in order
fn parse_paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => current = Some(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => {
                // Self-closing <w:p/> is an empty paragraph
                if e.local_name().as_ref() == b"p" {
                    paragraphs.push(String::new());
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Event::Text(t) => {
                if in_text {
                    if let Some(paragraph) = current.as_mut() {
                        paragraph.push_str(&t.unescape()?);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Extract embedded raster images from a .docx file, in archive entry
/// order.
///
/// Each image is decoded into an owned in-memory copy; the archive entry
/// handle is released before the images are returned.
pub fn extract_images_from_document(input: &Path) -> Result<Vec<DynamicImage>> {
    ensure_docx(input)?;

    let file = File::open(input)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let mut images = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_string();
        let lower = name.to_lowercase();
        if !lower.starts_with(MEDIA_PREFIX)
            || !RASTER_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
        {
            continue;
        }

        debug!("Decoding embedded media entry {name}");
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        images.push(image::load_from_memory(&bytes)?);
        // `entry` drops here, closing the archive entry before the next read
    }

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>First paragraph</w:t></w:r></w:p>
    <w:p><w:r><w:t>Second </w:t></w:r><w:r><w:t>paragraph</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>Fourth paragraph</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    fn png_bytes() -> Vec<u8> {
        let mut image = RgbImage::new(3, 2);
        for pixel in image.pixels_mut() {
            *pixel = Rgb([10, 200, 30]);
        }
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn write_fixture(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("fixture.docx");
        let file = File::create(&path).unwrap();
        let mut writer = ZipWriter::new(file);
        let options = FileOptions::default();

        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(DOCUMENT_XML.as_bytes()).unwrap();

        writer.start_file("word/media/image1.png", options).unwrap();
        writer.write_all(&png_bytes()).unwrap();

        // Non-raster media entry must be ignored
        writer.start_file("word/media/notes.txt", options).unwrap();
        writer.write_all(b"not an image").unwrap();

        writer.finish().unwrap();
        path
    }

    #[test]
    fn test_rejects_non_docx_input() {
        let err = extract_text_from_document(Path::new("file.doc"), None).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(_)));

        let err = extract_images_from_document(Path::new("file.pdf")).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_extract_text_joins_paragraphs_with_newlines() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = write_fixture(temp_dir.path());

        let text = extract_text_from_document(&path, None).unwrap();
        assert_eq!(
            text,
            "First paragraph\nSecond paragraph\n\nFourth paragraph"
        );
        assert_eq!(text.lines().count(), 4);
        assert_eq!(text.lines().nth(2), Some(""));
    }

    #[test]
    fn test_extract_text_writes_output_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = write_fixture(temp_dir.path());
        let out = temp_dir.path().join("out.txt");

        let text = extract_text_from_document(&path, Some(&out)).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), text);
    }

    #[test]
    fn test_extract_images_decodes_media_entries() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = write_fixture(temp_dir.path());

        let images = extract_images_from_document(&path).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!((images[0].width(), images[0].height()), (3, 2));
    }
}
