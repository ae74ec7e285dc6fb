//! Paginate-then-render tests against the public API.

use kitchen_sakhi::{paginate, render_pdf, PageGeometry};
use lopdf::{Document, Object};

fn numbered(n: usize) -> String {
    (1..=n)
        .map(|i| format!("  item {i}  "))
        .collect::<Vec<_>>()
        .join("\n")
}

fn as_f32(obj: &Object) -> f32 {
    match obj {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r as f32,
        other => panic!("not a number: {other:?}"),
    }
}

#[tokio::test]
async fn rendered_positions_follow_layout() {
    let seq = paginate(&numbered(40), &PageGeometry::A4);
    let bytes = render_pdf(seq).await.unwrap();
    let doc = Document::load_mem(&bytes).unwrap();

    let pages = doc.get_pages();
    assert_eq!(pages.len(), 2);

    let first_page = *pages.get(&1).unwrap();
    let content = doc.get_and_decode_page_content(first_page).unwrap();
    let positions: Vec<(f32, f32)> = content
        .operations
        .iter()
        .filter(|op| op.operator == "Td")
        .map(|op| (as_f32(&op.operands[0]), as_f32(&op.operands[1])))
        .collect();

    assert_eq!(positions.len(), 38);
    assert_eq!(positions[0], (50.0, 792.0));
    assert_eq!(positions[37], (50.0, 52.0));

    let texts: Vec<Vec<u8>> = content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match &op.operands[0] {
            Object::String(bytes, _) => Some(bytes.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(texts[0], b"item 1".to_vec());
}

#[tokio::test]
async fn custom_geometry_changes_page_size_and_capacity() {
    let geometry = PageGeometry::new(300.0, 200.0, 10.0, 20.0, 30.0, 20.0).unwrap();
    // start 180: 180, 150, 120, 90, 60, 30 -> six lines per page
    let seq = paginate(&numbered(13), &geometry);
    assert_eq!(
        seq.pages.iter().map(|p| p.lines.len()).collect::<Vec<_>>(),
        vec![6, 6, 1]
    );

    let bytes = render_pdf(seq).await.unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 3);
}

#[test]
fn blank_lines_consume_space() {
    let text = "\n".repeat(38);
    // 38 newlines -> 39 empty lines -> two pages
    let seq = paginate(&text, &PageGeometry::A4);
    assert_eq!(seq.line_count(), 39);
    assert_eq!(seq.page_count(), 2);
    assert!(seq.lines().all(|l| l.text.is_empty()));
}
