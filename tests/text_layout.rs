//! Reads the drawn text back out of rendered page content streams.
//!
//! `genpdf` draws every line in its own `BT`/`ET` block, positioned with `Td`, and shows glyphs as
//! two-byte glyph ids in `TJ` operands. Counting glyphs per block gives the line structure of a
//! page without depending on which font family was resolved.

#![cfg(feature = "bookmarks")]

use lopdf::Object;
use pdf_manual::fonts;
use pdf_manual::{compose, ComposerConfig, Document, RenderedPdf};

#[derive(Debug)]
struct DrawnLine {
    page: u32,
    y: f32,
    glyphs: usize,
}

fn render(document: &Document) -> Option<RenderedPdf> {
    if !fonts::fonts_available() {
        eprintln!("Skipping: no usable fonts found");
        return None;
    }

    Some(compose(document, ComposerConfig::default()).expect("render document"))
}

fn glyph_count(operands: &[Object]) -> usize {
    operands
        .iter()
        .map(|operand| match operand {
            Object::String(bytes, _) => bytes.len() / 2,
            Object::Array(items) => glyph_count(items),
            _ => 0,
        })
        .sum()
}

fn drawn_lines(bytes: &[u8]) -> Vec<DrawnLine> {
    let document = lopdf::Document::load_mem(bytes).expect("rendered PDF parses");
    let mut lines = Vec::new();

    for (page, page_id) in document.get_pages() {
        let content = document
            .get_and_decode_page_content(page_id)
            .expect("page content decodes");
        let mut current: Option<DrawnLine> = None;

        for operation in &content.operations {
            match operation.operator.as_str() {
                "BT" => {
                    current = Some(DrawnLine {
                        page,
                        y: 0.0,
                        glyphs: 0,
                    })
                }
                "Td" => {
                    if let Some(line) = current.as_mut() {
                        line.y = operation.operands[1].as_float().expect("numeric offset");
                    }
                }
                "Tj" | "TJ" => {
                    if let Some(line) = current.as_mut() {
                        line.glyphs += glyph_count(&operation.operands);
                    }
                }
                "ET" => lines.extend(current.take()),
                _ => {}
            }
        }
    }

    lines
}

#[test]
fn overflowing_body_loses_no_glyphs() {
    let body: String = (0..700).map(|n| format!("w{:04} ", n)).collect();
    let document = Document::from_pairs("Doc", [("Words", body.as_str())]);
    let Some(pdf) = render(&document) else {
        return;
    };
    assert!(pdf.page_count >= 2, "700 words should span pages");

    let lines = drawn_lines(&pdf.bytes);
    let total: usize = lines.iter().map(|line| line.glyphs).sum();
    let expected = "Doc".len() * pdf.page_count + "Words".len() + body.len();
    assert_eq!(total, expected, "every body character is drawn exactly once");

    let last_page = u32::try_from(pdf.page_count).expect("page count fits");
    let body_on_last_page = lines
        .iter()
        .filter(|line| line.page == last_page)
        .skip(1)
        .count();
    assert!(body_on_last_page > 0, "overflow continues on the last page");
}

#[test]
fn hard_breaks_draw_one_line_per_segment() {
    let body = "fn main() {\n    let x = 1;\n\n}";
    let document = Document::from_pairs("Doc", [("Code", body)]);
    let Some(pdf) = render(&document) else {
        return;
    };
    assert_eq!(pdf.page_count, 1);

    let lines = drawn_lines(&pdf.bytes);
    let glyphs: Vec<usize> = lines.iter().map(|line| line.glyphs).collect();
    assert_eq!(
        glyphs,
        [
            "Doc".len(),
            "Code".len(),
            "fn main() {".len(),
            "    let x = 1;".len(),
            "}".len(),
        ],
        "header, heading, then each segment on its own line with indentation kept"
    );

    let first_step = lines[2].y - lines[3].y;
    let blank_step = lines[3].y - lines[4].y;
    assert!(first_step > 0.0, "lines run down the page");
    assert!(
        (blank_step - 2.0 * first_step).abs() < 0.5,
        "the blank segment leaves one empty line ({} vs {})",
        blank_step,
        first_step
    );
}

#[test]
fn wrapping_only_adds_breaks_within_a_segment() {
    let long = "wrap ".repeat(60);
    let body = format!("{}\nnext", long.trim_end());
    let document = Document::from_pairs("Doc", [("Wrap", body.as_str())]);
    let Some(pdf) = render(&document) else {
        return;
    };

    let lines = drawn_lines(&pdf.bytes);
    let body_lines = &lines[2..];
    assert!(body_lines.len() >= 3, "the long segment wraps onto several lines");

    let wrapped: usize = body_lines[..body_lines.len() - 1]
        .iter()
        .map(|line| line.glyphs)
        .sum();
    assert_eq!(wrapped, long.trim_end().len());
    assert_eq!(body_lines[body_lines.len() - 1].glyphs, "next".len());
}
