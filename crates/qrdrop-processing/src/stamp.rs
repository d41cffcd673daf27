//! First-page image stamping
//!
//! The stamp is added without touching existing content streams:
//!
//! 1. the PNG becomes a Flate-compressed grayscale image XObject
//! 2. the page gets its own copy of its (possibly inherited) resources with the
//!    image registered under a fresh name
//! 3. `Contents` becomes `[q] + existing streams + [Q, draw]`, so whatever
//!    graphics state the original content leaves behind cannot move the stamp

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::io::{Cursor, Write};

use crate::error::{ProcessingError, ProcessingResult};
use crate::placement::{StampPlacement, StampRect};

/// Result of stamping a document
#[derive(Debug, Clone)]
pub struct StampedDocument {
    pub bytes: Vec<u8>,
    pub page_width: f64,
    pub page_height: f64,
    pub rect: StampRect,
}

/// Draws a PNG onto the first page of a PDF
#[derive(Debug, Clone, Default)]
pub struct PdfStamper {
    placement: StampPlacement,
}

impl PdfStamper {
    pub fn new(placement: StampPlacement) -> Self {
        PdfStamper { placement }
    }

    pub fn placement(&self) -> StampPlacement {
        self.placement
    }

    /// Embed `png` on the first page and serialize the result.
    pub fn stamp_first_page(&self, pdf: &[u8], png: &[u8]) -> ProcessingResult<StampedDocument> {
        let mut doc =
            Document::load_mem(pdf).map_err(|e| ProcessingError::PdfParse(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(ProcessingError::Encrypted);
        }

        let page_id = *doc
            .get_pages()
            .values()
            .next()
            .ok_or(ProcessingError::NoPages)?;

        let (llx, lly, urx, ury) = effective_mediabox(&doc, page_id).ok_or_else(|| {
            ProcessingError::MalformedPage("first page has no usable MediaBox".to_string())
        })?;
        let page_width = (urx - llx).abs();
        let page_height = (ury - lly).abs();
        let rect = self.placement.rect_for(page_width);

        let image_id = doc.add_object(image_xobject(png)?);

        let mut resources = effective_resources(&doc, page_id).unwrap_or_default();
        let mut xobjects = match resources.get(b"XObject") {
            Ok(obj) => obj_as_dict_owned(&doc, obj).unwrap_or_default(),
            Err(_) => Dictionary::new(),
        };
        let name = unused_name(&xobjects, "QrCode");
        xobjects.set(name.as_bytes().to_vec(), Object::Reference(image_id));
        resources.set("XObject", Object::Dictionary(xobjects));

        let mut contents = existing_contents(&doc, page_id)?;
        if !contents.is_empty() {
            let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
            contents.insert(0, Object::Reference(save_id));
        }
        let draw = draw_stream(&name, rect, !contents.is_empty())?;
        let draw_id = doc.add_object(Stream::new(Dictionary::new(), draw));
        contents.push(Object::Reference(draw_id));

        {
            let page = doc
                .get_object_mut(page_id)
                .and_then(|o| o.as_dict_mut())
                .map_err(|e| ProcessingError::MalformedPage(e.to_string()))?;
            page.set("Resources", Object::Dictionary(resources));
            page.set("Contents", Object::Array(contents));
        }

        let mut output = Cursor::new(Vec::new());
        doc.save_to(&mut output)
            .map_err(|e| ProcessingError::PdfWrite(e.to_string()))?;
        let bytes = output.into_inner();

        tracing::debug!(
            page_width,
            page_height,
            x = rect.x,
            y = rect.y,
            size_bytes = bytes.len(),
            "Stamped first page"
        );

        Ok(StampedDocument {
            bytes,
            page_width,
            page_height,
            rect,
        })
    }
}

fn image_xobject(png: &[u8]) -> ProcessingResult<Stream> {
    let img = image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .map_err(|e| ProcessingError::InvalidImage(e.to_string()))?
        .to_luma8();
    let (width, height) = img.dimensions();

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(img.as_raw())
        .map_err(|e| ProcessingError::InvalidImage(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| ProcessingError::InvalidImage(e.to_string()))?;

    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceGray",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };
    Ok(Stream::new(dict, compressed).with_compression(false))
}

fn draw_stream(name: &str, rect: StampRect, restore_first: bool) -> ProcessingResult<Vec<u8>> {
    let mut operations = Vec::with_capacity(5);
    if restore_first {
        operations.push(Operation::new("Q", vec![]));
    }
    operations.push(Operation::new("q", vec![]));
    operations.push(Operation::new(
        "cm",
        vec![
            Object::Real(rect.width as f32),
            0.into(),
            0.into(),
            Object::Real(rect.height as f32),
            Object::Real(rect.x as f32),
            Object::Real(rect.y as f32),
        ],
    ));
    operations.push(Operation::new(
        "Do",
        vec![Object::Name(name.as_bytes().to_vec())],
    ));
    operations.push(Operation::new("Q", vec![]));

    Content { operations }
        .encode()
        .map_err(|e| ProcessingError::PdfWrite(e.to_string()))
}

fn unused_name(xobjects: &Dictionary, prefix: &str) -> String {
    let mut n = 0;
    loop {
        let candidate = format!("{}{}", prefix, n);
        if !xobjects.has(candidate.as_bytes()) {
            return candidate;
        }
        n += 1;
    }
}

fn as_f64(n: &Object) -> Option<f64> {
    match n {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn obj_as_dict_owned(doc: &Document, obj: &Object) -> Option<Dictionary> {
    resolve(doc, obj)?.as_dict().ok().cloned()
}

fn parent_of<'a>(doc: &'a Document, dict: &Dictionary) -> Option<&'a Dictionary> {
    match dict.get(b"Parent").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        _ => None,
    }
}

/// Walk the page and its Parent chain for an inheritable attribute.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = doc.get_object(page_id).ok()?.as_dict().ok()?;
    // Page trees are shallow; the bound only guards against Parent cycles.
    for _ in 0..64 {
        if let Ok(obj) = current.get(key) {
            return resolve(doc, obj);
        }
        current = parent_of(doc, current)?;
    }
    None
}

fn effective_mediabox(doc: &Document, page_id: ObjectId) -> Option<(f64, f64, f64, f64)> {
    let array = inherited(doc, page_id, b"MediaBox")?.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }
    let value = |i: usize| resolve(doc, &array[i]).and_then(as_f64);
    Some((value(0)?, value(1)?, value(2)?, value(3)?))
}

fn effective_resources(doc: &Document, page_id: ObjectId) -> Option<Dictionary> {
    inherited(doc, page_id, b"Resources")?.as_dict().ok().cloned()
}

/// Page content as a flat list of stream references.
fn existing_contents(doc: &Document, page_id: ObjectId) -> ProcessingResult<Vec<Object>> {
    let page = doc
        .get_object(page_id)
        .and_then(|o| o.as_dict())
        .map_err(|e| ProcessingError::MalformedPage(e.to_string()))?;

    let contents = match page.get(b"Contents") {
        Ok(obj) => obj,
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => Ok(items.clone()),
            Ok(Object::Stream(_)) => Ok(vec![Object::Reference(*id)]),
            Ok(Object::Null) => Ok(Vec::new()),
            Ok(_) => Err(ProcessingError::MalformedPage(
                "Contents is neither a stream nor an array".to_string(),
            )),
            Err(e) => Err(ProcessingError::MalformedPage(e.to_string())),
        },
        Object::Array(items) => Ok(items.clone()),
        Object::Null => Ok(Vec::new()),
        _ => Err(ProcessingError::MalformedPage(
            "Contents is neither a stream nor an array".to_string(),
        )),
    }
}
