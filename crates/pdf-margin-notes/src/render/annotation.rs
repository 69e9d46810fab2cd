//! Free-text and line annotations with printable appearances

use crate::constants::{HELVETICA_ASCENT, NOTE_FONT_RESOURCE, TEXT_INSET};
use crate::layout::{NotePlacement, PageFrame, Segment, line_height};
use crate::types::{Color, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Annotation flag: print the annotation
const FLAG_PRINT: i64 = 4;

/// Objects shared by every note of a document
pub(crate) struct NoteResources {
    font_id: ObjectId,
}

impl NoteResources {
    /// Add the note font to the document
    pub fn new(doc: &mut Document) -> Self {
        Self {
            font_id: doc.add_object(note_font()),
        }
    }

    fn font_resources(&self) -> Dictionary {
        let mut fonts = Dictionary::new();
        fonts.set(NOTE_FONT_RESOURCE, Object::Reference(self.font_id));
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));
        resources
    }
}

/// Standard Helvetica with WinAnsi encoding
fn note_font() -> Dictionary {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    font
}

/// Create the free-text annotation holding a note's text.
///
/// Black Helvetica, left aligned, no border and no fill.
pub(crate) fn free_text_annotation(
    doc: &mut Document,
    page_id: ObjectId,
    frame: &PageFrame,
    note: &NotePlacement,
    font_size: f32,
    resources: &NoteResources,
    name: &str,
) -> Result<ObjectId> {
    let rect = frame.rect_to_pdf(&note.note_rect);
    let (width, height) = (rect[2] - rect[0], rect[3] - rect[1]);

    let mut operations = vec![
        Operation::new("q", vec![]),
        Operation::new("re", reals(&[0.0, 0.0, width, height])),
        Operation::new("W", vec![]),
        Operation::new("n", vec![]),
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(NOTE_FONT_RESOURCE.as_bytes().to_vec()),
                Object::Real(font_size),
            ],
        ),
        Operation::new("rg", reals(&Color::BLACK.components())),
        Operation::new("TL", reals(&[line_height(font_size)])),
        Operation::new(
            "Td",
            reals(&[
                TEXT_INSET,
                height - TEXT_INSET - font_size * HELVETICA_ASCENT / 1000.0,
            ]),
        ),
    ];
    for (index, line) in note.lines.iter().enumerate() {
        if index > 0 {
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(line), StringFormat::Literal)],
        ));
    }
    operations.push(Operation::new("ET", vec![]));
    operations.push(Operation::new("Q", vec![]));

    let appearance = form_xobject(
        doc,
        [0.0, 0.0, width, height],
        resources.font_resources(),
        operations,
    )?;

    let mut annotation = base_annotation("FreeText", page_id, rect, name, appearance);
    annotation.set("Contents", lopdf::text_string(&note.content));
    annotation.set(
        "DA",
        Object::string_literal(format!("0 0 0 rg /{} {} Tf", NOTE_FONT_RESOURCE, font_size)),
    );
    annotation.set("Q", Object::Integer(0));
    annotation.set("BS", border_style(0.0));

    Ok(doc.add_object(annotation))
}

/// Create one straight connector piece.
///
/// The interior color matches the stroke color.
pub(crate) fn line_annotation(
    doc: &mut Document,
    page_id: ObjectId,
    frame: &PageFrame,
    segment: &Segment,
    color: Color,
    line_width: f32,
    name: &str,
) -> Result<ObjectId> {
    let (x1, y1) = frame.to_pdf(segment.start);
    let (x2, y2) = frame.to_pdf(segment.end);
    let pad = line_width;
    let rect = [
        x1.min(x2) - pad,
        y1.min(y2) - pad,
        x1.max(x2) + pad,
        y1.max(y2) + pad,
    ];

    let operations = vec![
        Operation::new("q", vec![]),
        Operation::new("w", reals(&[line_width])),
        Operation::new("RG", reals(&color.components())),
        Operation::new("m", reals(&[x1, y1])),
        Operation::new("l", reals(&[x2, y2])),
        Operation::new("S", vec![]),
        Operation::new("Q", vec![]),
    ];
    // BBox equals Rect, so the appearance draws in page coordinates
    let appearance = form_xobject(doc, rect, Dictionary::new(), operations)?;

    let mut annotation = base_annotation("Line", page_id, rect, name, appearance);
    annotation.set("L", Object::Array(reals(&[x1, y1, x2, y2])));
    annotation.set("C", Object::Array(reals(&color.components())));
    annotation.set("IC", Object::Array(reals(&color.components())));
    annotation.set("BS", border_style(line_width));
    annotation.set(
        "LE",
        Object::Array(vec![
            Object::Name(b"None".to_vec()),
            Object::Name(b"None".to_vec()),
        ]),
    );

    Ok(doc.add_object(annotation))
}

fn base_annotation(
    subtype: &str,
    page_id: ObjectId,
    rect: [f32; 4],
    name: &str,
    appearance: ObjectId,
) -> Dictionary {
    let mut appearances = Dictionary::new();
    appearances.set("N", Object::Reference(appearance));

    let mut annotation = Dictionary::new();
    annotation.set("Type", Object::Name(b"Annot".to_vec()));
    annotation.set("Subtype", Object::Name(subtype.as_bytes().to_vec()));
    annotation.set("Rect", Object::Array(reals(&rect)));
    annotation.set("P", Object::Reference(page_id));
    annotation.set("NM", lopdf::text_string(name));
    annotation.set("F", Object::Integer(FLAG_PRINT));
    annotation.set("AP", Object::Dictionary(appearances));
    annotation
}

fn form_xobject(
    doc: &mut Document,
    bbox: [f32; 4],
    resources: Dictionary,
    operations: Vec<Operation>,
) -> Result<ObjectId> {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Form".to_vec()));
    dict.set("FormType", Object::Integer(1));
    dict.set("BBox", Object::Array(reals(&bbox)));
    dict.set("Resources", Object::Dictionary(resources));

    let content = Content { operations }.encode()?;
    Ok(doc.add_object(Stream::new(dict, content)))
}

fn border_style(width: f32) -> Object {
    let mut style = Dictionary::new();
    style.set("W", Object::Real(width));
    style.set("S", Object::Name(b"S".to_vec()));
    Object::Dictionary(style)
}

fn reals(values: &[f32]) -> Vec<Object> {
    values.iter().copied().map(Object::Real).collect()
}

/// Encode for the note font; characters outside WinAnsi become `?`
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    let font = note_font();
    let Ok(encoding) = font.get_font_encoding(&Document::new()) else {
        return text
            .chars()
            .map(|ch| if ch.is_ascii() { ch as u8 } else { b'?' })
            .collect();
    };

    let mut buffer = [0; 4];
    text.chars()
        .map(|ch| if ch == '\t' { ' ' } else { ch })
        .map(|ch| match encoding.string_to_bytes(ch.encode_utf8(&mut buffer)).as_slice() {
            [byte] => *byte,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Café – €"), b"Caf\xe9 \x96 \x80".to_vec());
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn test_encode_win_ansi_replaces_tabs() {
        assert_eq!(encode_win_ansi("a\tb"), b"a b".to_vec());
    }
}
