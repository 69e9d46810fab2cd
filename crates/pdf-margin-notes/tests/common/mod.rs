#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::path::Path;

/// Every glyph of the test font is 500/1000 em wide: 6pt at 12pt size
pub const GLYPH_WIDTH: i64 = 500;
pub const FONT_SIZE: f32 = 12.0;

/// A line of body text drawn at a PDF-space baseline position
pub struct TextLine {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

pub fn line(x: f32, y: f32, text: &str) -> TextLine {
    TextLine {
        x,
        y,
        text: text.to_string(),
    }
}

pub struct TestPage {
    pub width: f32,
    pub height: f32,
    pub lines: Vec<TextLine>,
    pub annotations: Vec<Dictionary>,
}

impl TestPage {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            lines: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn text(mut self, x: f32, y: f32, text: &str) -> Self {
        self.lines.push(line(x, y, text));
        self
    }

    pub fn annotation(mut self, annotation: Dictionary) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Build a document from page descriptions.
///
/// Annotations are stored as indirect objects in an inline `/Annots` array.
pub fn create_test_pdf(pages: Vec<TestPage>) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"TestSans".to_vec())),
        ("FirstChar", Object::Integer(32)),
        ("LastChar", Object::Integer(126)),
        (
            "Widths",
            Object::Array((32..=126).map(|_| Object::Integer(GLYPH_WIDTH)).collect()),
        ),
    ]));

    let page_count = pages.len();
    let mut kids = Vec::new();
    for page in pages {
        let mut content = String::new();
        for line in &page.lines {
            content.push_str(&format!(
                "BT /F1 {} Tf {} {} Td ({}) Tj ET\n",
                FONT_SIZE, line.x, line.y, line.text
            ));
        }
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut fonts = Dictionary::new();
        fonts.set("F1", Object::Reference(font_id));
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));

        let annots: Vec<Object> = page
            .annotations
            .into_iter()
            .map(|annotation| Object::Reference(doc.add_object(annotation)))
            .collect();

        let mut page_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("MediaBox", reals(&[0.0, 0.0, page.width, page.height])),
            ("Resources", Object::Dictionary(resources)),
            ("Contents", Object::Reference(content_id)),
        ]);
        if !annots.is_empty() {
            page_dict.set("Annots", Object::Array(annots));
        }
        kids.push(Object::Reference(doc.add_object(page_dict)));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(page_count as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

pub fn reals(values: &[f32]) -> Object {
    Object::Array(values.iter().copied().map(Object::Real).collect())
}

fn annotation(subtype: &str, rect: [f32; 4], contents: &str) -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Annot".to_vec())),
        ("Subtype", Object::Name(subtype.as_bytes().to_vec())),
        ("Rect", reals(&rect)),
        (
            "Contents",
            Object::String(contents.as_bytes().to_vec(), StringFormat::Literal),
        ),
    ])
}

/// Sticky note with the given PDF-space rectangle
pub fn sticky_note(rect: [f32; 4], contents: &str) -> Dictionary {
    annotation("Text", rect, contents)
}

/// Square annotation with a stroke color
pub fn square(rect: [f32; 4], contents: &str, color: &[f32]) -> Dictionary {
    let mut dict = annotation("Square", rect, contents);
    dict.set("C", reals(color));
    dict
}

/// Polygon annotation through PDF-space `vertices` (x, y pairs)
pub fn polygon(vertices: &[f32], contents: &str) -> Dictionary {
    let xs = vertices.iter().step_by(2);
    let ys = vertices.iter().skip(1).step_by(2);
    let rect = [
        xs.clone().copied().fold(f32::INFINITY, f32::min),
        ys.clone().copied().fold(f32::INFINITY, f32::min),
        xs.copied().fold(f32::NEG_INFINITY, f32::max),
        ys.copied().fold(f32::NEG_INFINITY, f32::max),
    ];
    let mut dict = annotation("Polygon", rect, contents);
    dict.set("Vertices", reals(vertices));
    dict
}

pub fn link(rect: [f32; 4]) -> Dictionary {
    annotation("Link", rect, "")
}

pub fn popup(rect: [f32; 4]) -> Dictionary {
    annotation("Popup", rect, "")
}

pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

/// Annotation dictionaries of a page, in `/Annots` order
pub fn annotations(doc: &Document, page_id: ObjectId) -> Vec<Dictionary> {
    let page = doc.get_dictionary(page_id).unwrap();
    let annots = match page.get(b"Annots") {
        Ok(Object::Reference(id)) => doc.get_object(*id).unwrap().as_array().unwrap().clone(),
        Ok(Object::Array(items)) => items.clone(),
        _ => return Vec::new(),
    };
    annots
        .iter()
        .map(|item| match item {
            Object::Reference(id) => doc.get_dictionary(*id).unwrap().clone(),
            Object::Dictionary(dict) => dict.clone(),
            other => panic!("unexpected annotation entry {:?}", other),
        })
        .collect()
}

pub fn subtype(annotation: &Dictionary) -> String {
    String::from_utf8_lossy(annotation.get(b"Subtype").unwrap().as_name().unwrap()).into_owned()
}

pub fn count_subtype(annotations: &[Dictionary], name: &str) -> usize {
    annotations.iter().filter(|a| subtype(a) == name).count()
}

pub fn numbers(object: &Object) -> Vec<f32> {
    object
        .as_array()
        .unwrap()
        .iter()
        .map(|value| match value {
            Object::Integer(i) => *i as f32,
            Object::Real(r) => *r,
            other => panic!("not a number: {:?}", other),
        })
        .collect()
}

pub fn media_box(doc: &Document, page_id: ObjectId) -> Vec<f32> {
    numbers(doc.get_dictionary(page_id).unwrap().get(b"MediaBox").unwrap())
}

pub fn write_pdf(doc: &mut Document, path: &Path) {
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    std::fs::write(path, writer).unwrap();
}

/// Replace a page's content stream
pub fn set_content(doc: &mut Document, page_id: ObjectId, content: &str) {
    let content_id = doc
        .get_dictionary(page_id)
        .unwrap()
        .get(b"Contents")
        .unwrap()
        .as_reference()
        .unwrap();
    doc.objects.insert(
        content_id,
        Object::Stream(Stream::new(Dictionary::new(), content.as_bytes().to_vec())),
    );
}

/// Attach a `/ToUnicode` stream to the body text font
pub fn set_font_to_unicode(doc: &mut Document, cmap: &[u8]) {
    let font_id = doc
        .objects
        .iter()
        .find(|(_, object)| {
            matches!(object.as_dict().and_then(|dict| dict.get(b"BaseFont")),
                Ok(Object::Name(name)) if name == b"TestSans")
        })
        .map(|(id, _)| *id)
        .unwrap();
    let cmap_id = doc.add_object(Stream::new(Dictionary::new(), cmap.to_vec()));
    doc.get_dictionary_mut(font_id)
        .unwrap()
        .set("ToUnicode", Object::Reference(cmap_id));
}

pub fn text_of(annotation: &Dictionary) -> String {
    match annotation.get(b"Contents") {
        Ok(Object::String(bytes, _)) => String::from_utf8_lossy(bytes).into_owned(),
        _ => String::new(),
    }
}

/// 600x800 page with one body line ending at x=300 and a sticky note whose
/// top-right corner is at (590, 790)
pub fn scenario_page() -> TestPage {
    TestPage::new(600.0, 800.0)
        .text(60.0, 700.0, "The quick brown fox jumps over lazy dogs")
        .annotation(sticky_note([570.0, 770.0, 590.0, 790.0], "Hello"))
}

/// Two text columns with a square annotation in the left one
pub fn two_column_page() -> TestPage {
    let mut page = TestPage::new(600.0, 800.0);
    for y in [700.0, 680.0, 660.0, 640.0] {
        page = page.text(60.0, y, "Left column text").text(320.0, y, "Column");
    }
    page.annotation(square([100.0, 600.0, 150.0, 620.0], "Check this", &[0.0, 0.0, 1.0]))
}
