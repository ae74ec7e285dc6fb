//! PDF serialisation of a [`PageSequence`] via `lopdf`.
//!
//! Every page becomes one PDF page object sharing a single Helvetica font
//! resource. Each placed line turns into one text-show operation at its
//! layout position, so the document reproduces the paginator's geometry
//! exactly.
//!
//! Building the object graph is CPU-bound, so [`render_pdf`] moves the work
//! onto `spawn_blocking` and keeps the Tokio worker threads free.

use crate::error::KitchenError;
use crate::pipeline::paginate::{LayoutLine, PageSequence};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

/// Font size used for every line.
pub const FONT_SIZE: f32 = 12.0;

const FONT_NAME: &str = "F1";

/// Render the sequence to PDF bytes on the blocking thread pool.
pub async fn render_pdf(sequence: PageSequence) -> Result<Vec<u8>, KitchenError> {
    tokio::task::spawn_blocking(move || render_pdf_blocking(&sequence))
        .await
        .map_err(|e| KitchenError::Internal(format!("Render task panicked: {}", e)))?
}

/// Blocking implementation of [`render_pdf`].
pub fn render_pdf_blocking(sequence: &PageSequence) -> Result<Vec<u8>, KitchenError> {
    let geometry = sequence.geometry;
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_NAME => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(sequence.page_count());
    for page in &sequence.pages {
        let content = page_content(&page.lines);
        let encoded = content.encode().map_err(|e| KitchenError::Render {
            detail: format!("failed to encode page {}: {}", page.index + 1, e),
        })?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_total = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_total,
        "Resources" => resources_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            Object::Real(geometry.width),
            Object::Real(geometry.height),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id: ObjectId = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(|e| KitchenError::Render {
        detail: format!("failed to serialise PDF: {}", e),
    })?;

    debug!(
        "Rendered {} pages, {} lines, {} bytes",
        sequence.page_count(),
        sequence.line_count(),
        bytes.len()
    );
    Ok(bytes)
}

/// Content stream for one page: one BT/ET block per line.
fn page_content(lines: &[LayoutLine]) -> Content {
    let mut operations = Vec::with_capacity(lines.len() * 5);
    for line in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![Object::Name(FONT_NAME.as_bytes().to_vec()), Object::Real(FONT_SIZE)],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Real(line.x), Object::Real(line.y)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&line.text), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }
}

/// Encode text for a standard Type1 font declared with `/WinAnsiEncoding`.
///
/// Latin-1 maps to itself; the punctuation WinAnsi keeps in 0x80..=0x9F
/// (curly quotes, dashes, bullet, euro, ...) is remapped. Anything else
/// becomes `?`.
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ 0x20..=0x7E | code @ 0xA0..=0xFF => code as u8,
            _ => win_ansi_high(c).unwrap_or(b'?'),
        })
        .collect()
}

/// The 27 code points WinAnsi places in 0x80..=0x9F.
fn win_ansi_high(c: char) -> Option<u8> {
    let byte = match c {
        '\u{20AC}' => 0x80, // €
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85, // …
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95, // •
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99, // ™
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::paginate::{paginate, PageGeometry};

    #[test]
    fn encode_replaces_unsupported_chars() {
        assert_eq!(encode_win_ansi("Dal (₹40)"), b"Dal (?40)".to_vec());
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("a\tb"), b"a?b".to_vec());
    }

    #[test]
    fn encode_maps_win_ansi_punctuation() {
        assert_eq!(
            encode_win_ansi("\u{2022} Aloo\u{2019}s \u{2013} \u{20AC}5"),
            vec![0x95, b' ', b'A', b'l', b'o', b'o', 0x92, b's', b' ', 0x96, b' ', 0x80, b'5']
        );
        assert_eq!(
            encode_win_ansi("\u{201C}Dal\u{201D}\u{2014}\u{2018}x\u{2026}\u{2122}"),
            vec![0x93, b'D', b'a', b'l', 0x94, 0x97, 0x91, b'x', 0x85, 0x99]
        );
        // Unassigned WinAnsi slots are not a passthrough for C1 controls.
        assert_eq!(encode_win_ansi("\u{0081}\u{0095}"), b"??".to_vec());
    }

    #[test]
    fn page_count_matches_layout() {
        let text = (0..39).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let seq = paginate(&text, &PageGeometry::A4);
        let bytes = render_pdf_blocking(&seq).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn empty_sequence_still_renders_one_page() {
        let seq = paginate("", &PageGeometry::A4);
        let bytes = render_pdf_blocking(&seq).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn content_has_one_text_show_per_line() {
        let seq = paginate("a\n\nb", &PageGeometry::A4);
        let content = page_content(&seq.pages[0].lines);
        let shows = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .count();
        assert_eq!(shows, 3);
    }
}
