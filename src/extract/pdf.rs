//! # PDF Extraction Module
//!
//! Estrazione da file PDF: testo per pagina e immagini XObject.
//!
//! ## Responsabilità:
//! - Testo: una stringa per pagina (vuota se la pagina non ha testo
//!   estraibile), concatenate con newline
//! - Immagini: per ogni pagina in ordine, ogni XObject immagine nell'ordine
//!   riportato dal parser, decodificato e convertito a RGB a 3 canali
//! - Filtro contenuti degeneri: un'immagine pixel-per-pixel identica a un
//!   nero pieno della stessa dimensione è un placeholder (es. masking
//!   layer) e viene scartata
//!
//! ## Encoding supportati:
//! - `DCTDecode` (JPEG embedded), `FlateDecode` e stream non filtrati con
//!   8 bit per componente in DeviceRGB/DeviceGray
//! - Gli altri encoding (JPXDecode, CCITT, catene di filtri) vengono
//!   saltati con un warning invece di far fallire l'intera estrazione

use crate::error::{ConvertError, Result};
use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::path::Path;
use tracing::{debug, warn};

fn ensure_pdf(input: &Path) -> Result<()> {
    match input.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => Ok(()),
        _ => Err(ConvertError::UnsupportedFormat(
            "only .pdf files are supported".to_string(),
        )),
    }
}

/// Extract the text of a PDF file page by page, optionally writing it to
/// `output` as UTF-8.
///
/// Pages are joined with `"\n"`; a page that yields no extractable text
/// contributes an empty string, not an error.
pub fn extract_text_from_pdf(input: &Path, output: Option<&Path>) -> Result<String> {
    ensure_pdf(input)?;

    let doc = Document::load(input)?;
    let pages: Vec<String> = doc
        .get_pages()
        .into_keys()
        .map(|number| doc.extract_text(&[number]).unwrap_or_default())
        .collect();
    let text = pages.join("\n");

    if let Some(path) = output {
        std::fs::write(path, &text)?;
    }
    Ok(text)
}

/// Extract embedded images from a PDF file, page order first, then the
/// order the parser reports each page's XObjects.
///
/// Every surviving image is an owned 3-channel RGB copy; images identical
/// to solid black are discarded as non-content placeholders.
pub fn extract_images_from_pdf(input: &Path) -> Result<Vec<DynamicImage>> {
    ensure_pdf(input)?;

    let doc = Document::load(input)?;
    let mut images = Vec::new();

    for (_, page_id) in doc.get_pages() {
        for object_id in page_image_xobjects(&doc, page_id)? {
            let Some(decoded) = decode_image(&doc, object_id)? else {
                warn!("Skipping image {object_id:?}: unsupported encoding");
                continue;
            };
            let rgb = decoded.to_rgb8();
            if is_solid_black(&rgb) {
                debug!("Skipping image {object_id:?}: solid black placeholder");
                continue;
            }
            images.push(DynamicImage::ImageRgb8(rgb));
        }
    }

    Ok(images)
}

/// Resolve an object to a dictionary, following one level of indirection
fn deref_dict<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Dictionary> {
    match object {
        Object::Reference(id) => Ok(doc.get_dictionary(*id)?),
        _ => Ok(object.as_dict()?),
    }
}

/// The page's resource dictionary, walking up the Pages tree when the
/// page itself carries none
fn page_resources<'a>(doc: &'a Document, page_id: ObjectId) -> Result<Option<&'a Dictionary>> {
    let mut dict = doc.get_dictionary(page_id)?;
    loop {
        if let Ok(resources) = dict.get(b"Resources") {
            return Ok(Some(deref_dict(doc, resources)?));
        }
        match dict.get(b"Parent") {
            Ok(parent) => dict = deref_dict(doc, parent)?,
            Err(_) => return Ok(None),
        }
    }
}

/// Object ids of the image XObjects referenced by a page, in dictionary
/// order
fn page_image_xobjects(doc: &Document, page_id: ObjectId) -> Result<Vec<ObjectId>> {
    let mut ids = Vec::new();

    let Some(resources) = page_resources(doc, page_id)? else {
        return Ok(ids);
    };
    let Ok(xobjects) = resources.get(b"XObject") else {
        return Ok(ids);
    };

    for (_, object) in deref_dict(doc, xobjects)?.iter() {
        let Object::Reference(id) = object else {
            continue;
        };
        let Ok(stream) = doc.get_object(*id).and_then(|o| o.as_stream()) else {
            continue;
        };
        let is_image = stream
            .dict
            .get(b"Subtype")
            .and_then(|o| o.as_name())
            .map(|name| name == b"Image")
            .unwrap_or(false);
        if is_image {
            ids.push(*id);
        }
    }

    Ok(ids)
}

enum StreamFilter {
    None,
    Name(Vec<u8>),
    Unsupported,
}

fn stream_filter(dict: &Dictionary) -> StreamFilter {
    match dict.get(b"Filter") {
        Err(_) => StreamFilter::None,
        Ok(Object::Name(name)) => StreamFilter::Name(name.clone()),
        Ok(Object::Array(filters)) if filters.len() == 1 => match filters[0].as_name() {
            Ok(name) => StreamFilter::Name(name.to_vec()),
            Err(_) => StreamFilter::Unsupported,
        },
        Ok(_) => StreamFilter::Unsupported,
    }
}

/// Decode an image XObject; `None` when its encoding is unsupported
fn decode_image(doc: &Document, id: ObjectId) -> Result<Option<DynamicImage>> {
    let stream = doc.get_object(id)?.as_stream()?;

    match stream_filter(&stream.dict) {
        StreamFilter::Name(name) if name == b"DCTDecode" => {
            Ok(Some(image::load_from_memory(&stream.content)?))
        }
        StreamFilter::Name(name) if name == b"FlateDecode" => {
            let data = stream.decompressed_content()?;
            Ok(raw_image(&stream.dict, data))
        }
        StreamFilter::None => Ok(raw_image(&stream.dict, stream.content.clone())),
        _ => Ok(None),
    }
}

/// Build an image from raw 8-bit DeviceRGB/DeviceGray samples
fn raw_image(dict: &Dictionary, data: Vec<u8>) -> Option<DynamicImage> {
    let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
    let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;
    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8);
    if bits != 8 {
        return None;
    }

    let color_space = dict.get(b"ColorSpace").ok().and_then(|o| o.as_name().ok());
    match color_space {
        Some(name) if name == b"DeviceRGB" => {
            RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8)
        }
        Some(name) if name == b"DeviceGray" => {
            GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8)
        }
        _ => None,
    }
}

/// Pixel-for-pixel comparison against a solid black image of the same size
fn is_solid_black(image: &RgbImage) -> bool {
    image.pixels().all(|pixel| pixel.0 == [0, 0, 0])
}
