//! Test fixtures: PDFs built with lopdf and helpers to inspect stamped output.

use flate2::read::ZlibDecoder;
use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::io::Read;

/// One page per entry of `sizes`, each with its own MediaBox and a tiny content stream.
pub fn pdf_with_pages(sizes: &[(f32, f32)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = sizes
        .iter()
        .map(|(w, h)| {
            let content_id = doc.add_object(Stream::new(
                Dictionary::new(),
                b"0 0 m 50 50 l S".to_vec(),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), Object::Real(*w), Object::Real(*h)],
                "Contents" => content_id,
                "Resources" => dictionary! {},
            });
            Object::Reference(page_id)
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("Failed to serialize fixture PDF");
    buffer
}

pub fn single_page_pdf(width: f32, height: f32) -> Vec<u8> {
    pdf_with_pages(&[(width, height)])
}

pub fn zero_page_pdf() -> Vec<u8> {
    pdf_with_pages(&[])
}

/// Bytes that are declared as a PDF but are not one.
pub fn not_a_pdf() -> Vec<u8> {
    b"%PDF-1.7\nthis file was truncated in transit".to_vec()
}

/// What the stamper left on a page.
pub struct Stamp {
    /// `cm` operands: `[a b c d e f]`
    pub matrix: Vec<f32>,
    pub image_width: i64,
    pub image_height: i64,
    /// Decoded 8-bit grayscale samples of the embedded image.
    pub pixels: Vec<u8>,
}

/// Find the QR stamp drawn on page `page_number` (1-based), if any.
pub fn find_stamp(pdf: &[u8], page_number: u32) -> Option<Stamp> {
    let doc = Document::load_mem(pdf).expect("stored document should parse");
    let page_id = *doc.get_pages().get(&page_number)?;
    let page = doc.get_object(page_id).ok()?.as_dict().ok()?;

    let resources = page.get(b"Resources").ok()?.as_dict().ok()?;
    let xobjects = resources.get(b"XObject").ok()?.as_dict().ok()?;

    let contents = page.get(b"Contents").ok()?.as_array().ok()?;
    for item in contents.iter().rev() {
        let stream = doc.get_object(item.as_reference().ok()?).ok()?.as_stream().ok()?;
        let content = Content::decode(&stream.content).ok()?;
        let ops = &content.operations;

        for (i, op) in ops.iter().enumerate() {
            if op.operator != "Do" || i == 0 || ops[i - 1].operator != "cm" {
                continue;
            }
            let name = op.operands.first()?.as_name().ok()?;
            let image_id = xobjects.get(name).ok()?.as_reference().ok()?;
            let image = doc.get_object(image_id).ok()?.as_stream().ok()?;

            let mut pixels = Vec::new();
            ZlibDecoder::new(image.content.as_slice())
                .read_to_end(&mut pixels)
                .ok()?;

            return Some(Stamp {
                matrix: ops[i - 1]
                    .operands
                    .iter()
                    .map(|o| o.as_float().unwrap_or(f32::NAN))
                    .collect(),
                image_width: image.dict.get(b"Width").ok()?.as_i64().ok()?,
                image_height: image.dict.get(b"Height").ok()?.as_i64().ok()?,
                pixels,
            });
        }
    }
    None
}

/// Grayscale samples of a PNG, for comparing against an embedded image.
pub fn png_pixels(png: &[u8]) -> (u32, u32, Vec<u8>) {
    let img = image::load_from_memory(png)
        .expect("PNG should decode")
        .to_luma8();
    (img.width(), img.height(), img.into_raw())
}
