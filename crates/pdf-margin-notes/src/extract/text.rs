//! Word boxes from page content streams
//!
//! A small content-stream interpreter that tracks just enough graphics and
//! text state to place every shown glyph, then groups glyphs into words.

use std::collections::HashMap;
use std::rc::Rc;

use crate::constants::MAX_FORM_DEPTH;
use crate::layout::{PageFrame, Word};
use crate::types::Result;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};

use super::fonts::FontMetrics;
use super::matrix::Matrix;
use super::page::page_resources;
use super::{get_resolved, number, numbers, resolve_dict};

/// Gap between glyphs, relative to glyph height, that starts a new word
const WORD_GAP_RATIO: f32 = 0.2;

/// Backwards jump, relative to glyph height, that starts a new word
const BACKTRACK_RATIO: f32 = 0.5;

/// Extract the words on a page, in content-stream order.
///
/// Boxes are in page-local coordinates relative to `frame`.
pub fn extract_words(doc: &Document, page_id: ObjectId, frame: &PageFrame) -> Result<Vec<Word>> {
    let page = doc.get_dictionary(page_id)?;
    let content = doc.get_page_content(page_id)?;

    let mut extractor = WordExtractor::new(doc, *frame);
    extractor.run(&content, page_resources(doc, page), Matrix::IDENTITY, 0)?;
    Ok(extractor.finish())
}

#[derive(Debug, Clone)]
struct TextState<'a> {
    font: Option<Rc<FontMetrics<'a>>>,
    size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scaling: f32,
    leading: f32,
    rise: f32,
}

impl Default for TextState<'_> {
    fn default() -> Self {
        Self {
            font: None,
            size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
struct GraphicsState<'a> {
    ctm: Matrix,
    text: TextState<'a>,
}

/// Text object matrices, reset by `BT`
#[derive(Debug, Clone, Copy)]
struct TextMatrices {
    tm: Matrix,
    tlm: Matrix,
}

impl TextMatrices {
    fn new() -> Self {
        Self {
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
        }
    }

    fn set(&mut self, matrix: Matrix) {
        self.tm = matrix;
        self.tlm = matrix;
    }

    fn next_line(&mut self, tx: f32, ty: f32) {
        self.set(Matrix::translate(tx, ty).multiply(&self.tlm));
    }
}

/// A glyph placed on the page, in local coordinates
struct Glyph {
    text: String,
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl Glyph {
    fn height(&self) -> f32 {
        self.bottom - self.top
    }

    fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }
}

struct WordExtractor<'a> {
    doc: &'a Document,
    frame: PageFrame,
    fonts: HashMap<ObjectId, Rc<FontMetrics<'a>>>,
    fallback_font: Rc<FontMetrics<'a>>,
    words: Vec<Word>,
    pending: Option<Word>,
}

impl<'a> WordExtractor<'a> {
    fn new(doc: &'a Document, frame: PageFrame) -> Self {
        Self {
            doc,
            frame,
            fonts: HashMap::new(),
            fallback_font: Rc::new(FontMetrics::fallback()),
            words: Vec::new(),
            pending: None,
        }
    }

    fn finish(mut self) -> Vec<Word> {
        self.break_word();
        self.words
    }

    fn run(
        &mut self,
        content: &[u8],
        resources: Option<&'a Dictionary>,
        ctm: Matrix,
        depth: usize,
    ) -> Result<()> {
        let content = Content::decode(content)?;
        let mut state = GraphicsState {
            ctm,
            text: TextState::default(),
        };
        let mut saved = Vec::new();
        let mut matrices = TextMatrices::new();

        for operation in &content.operations {
            let operands = &operation.operands;
            let num = |index: usize| operands.get(index).and_then(number).unwrap_or(0.0);

            match operation.operator.as_str() {
                "q" => saved.push(state.clone()),
                "Q" => {
                    if let Some(previous) = saved.pop() {
                        state = previous;
                    }
                }
                "cm" => {
                    if let Some(matrix) = operand_matrix(operands) {
                        state.ctm = matrix.multiply(&state.ctm);
                    }
                }
                "BT" => matrices = TextMatrices::new(),
                "ET" => self.break_word(),
                "Tf" => {
                    self.break_word();
                    state.text.font = operands
                        .first()
                        .and_then(|name| name.as_name().ok())
                        .and_then(|name| self.font(resources, name));
                    state.text.size = num(1);
                }
                "Tc" => state.text.char_spacing = num(0),
                "Tw" => state.text.word_spacing = num(0),
                "Tz" => state.text.horizontal_scaling = num(0) / 100.0,
                "TL" => state.text.leading = num(0),
                "Ts" => state.text.rise = num(0),
                "Td" => matrices.next_line(num(0), num(1)),
                "TD" => {
                    state.text.leading = -num(1);
                    matrices.next_line(num(0), num(1));
                }
                "Tm" => {
                    if let Some(matrix) = operand_matrix(operands) {
                        matrices.set(matrix);
                    }
                }
                "T*" => matrices.next_line(0.0, -state.text.leading),
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = operands.first() {
                        self.show_text(&state, &mut matrices.tm, bytes);
                    }
                }
                "'" => {
                    matrices.next_line(0.0, -state.text.leading);
                    if let Some(Object::String(bytes, _)) = operands.first() {
                        self.show_text(&state, &mut matrices.tm, bytes);
                    }
                }
                "\"" => {
                    state.text.word_spacing = num(0);
                    state.text.char_spacing = num(1);
                    matrices.next_line(0.0, -state.text.leading);
                    if let Some(Object::String(bytes, _)) = operands.get(2) {
                        self.show_text(&state, &mut matrices.tm, bytes);
                    }
                }
                "TJ" => {
                    if let Some(Object::Array(items)) = operands.first() {
                        for item in items {
                            match item {
                                Object::String(bytes, _) => {
                                    self.show_text(&state, &mut matrices.tm, bytes)
                                }
                                other => {
                                    if let Some(adjust) = number(other) {
                                        let tx = -adjust / 1000.0
                                            * state.text.size
                                            * state.text.horizontal_scaling;
                                        matrices.tm = Matrix::translate(tx, 0.0).multiply(&matrices.tm);
                                    }
                                }
                            }
                        }
                    }
                }
                "Do" => {
                    if let Some(name) = operands.first().and_then(|name| name.as_name().ok()) {
                        self.break_word();
                        self.draw_form(resources, name, state.ctm, depth)?;
                        self.break_word();
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Interpret a Form XObject referenced by `Do`
    fn draw_form(
        &mut self,
        resources: Option<&'a Dictionary>,
        name: &[u8],
        ctm: Matrix,
        depth: usize,
    ) -> Result<()> {
        if depth >= MAX_FORM_DEPTH {
            log::debug!("Skipping form XObject nested {} levels deep", depth);
            return Ok(());
        }

        let doc = self.doc;
        let Some(stream) = resources
            .and_then(|resources| get_resolved(doc, resources, b"XObject"))
            .and_then(|xobjects| resolve_dict(doc, xobjects))
            .and_then(|xobjects| get_resolved(doc, xobjects, name))
            .and_then(|xobject| xobject.as_stream().ok())
        else {
            return Ok(());
        };

        let is_form = matches!(
            stream.dict.get(b"Subtype"),
            Ok(Object::Name(subtype)) if subtype.as_slice() == b"Form"
        );
        if !is_form {
            return Ok(());
        }

        let matrix = get_resolved(doc, &stream.dict, b"Matrix")
            .and_then(|matrix| numbers(doc, matrix))
            .and_then(|values| Matrix::from_slice(&values))
            .unwrap_or(Matrix::IDENTITY);
        let form_resources = get_resolved(doc, &stream.dict, b"Resources")
            .and_then(|res| res.as_dict().ok())
            .or(resources);
        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());

        self.run(&data, form_resources, matrix.multiply(&ctm), depth + 1)
    }

    /// Font metrics for a `Tf` resource name
    fn font(&mut self, resources: Option<&'a Dictionary>, name: &[u8]) -> Option<Rc<FontMetrics<'a>>> {
        let doc = self.doc;
        let fonts = resources
            .and_then(|resources| get_resolved(doc, resources, b"Font"))
            .and_then(|fonts| resolve_dict(doc, fonts));

        let Some(entry) = fonts.and_then(|fonts| fonts.get(name).ok()) else {
            log::debug!(
                "Font /{} not found in resources",
                String::from_utf8_lossy(name)
            );
            return Some(self.fallback_font.clone());
        };

        match entry {
            Object::Reference(id) => {
                if let Some(metrics) = self.fonts.get(id) {
                    return Some(metrics.clone());
                }
                let metrics = Rc::new(
                    resolve_dict(doc, entry)
                        .map(|font| FontMetrics::load(doc, font))
                        .unwrap_or_else(FontMetrics::fallback),
                );
                self.fonts.insert(*id, metrics.clone());
                Some(metrics)
            }
            Object::Dictionary(font) => Some(Rc::new(FontMetrics::load(doc, font))),
            _ => Some(self.fallback_font.clone()),
        }
    }

    /// Place every glyph of a shown string and advance the text matrix
    fn show_text(&mut self, state: &GraphicsState<'a>, tm: &mut Matrix, bytes: &[u8]) {
        let text = &state.text;
        let font = text
            .font
            .clone()
            .unwrap_or_else(|| self.fallback_font.clone());

        for code in font.codes(bytes) {
            let w0 = font.width(code) / 1000.0;
            let is_space = code == 32 && font.is_single_byte();

            let trm = Matrix::new(
                text.size * text.horizontal_scaling,
                0.0,
                0.0,
                text.size,
                0.0,
                text.rise,
            )
            .multiply(tm)
            .multiply(&state.ctm);

            let decoded = font.decode(code);
            if is_space || decoded.trim().is_empty() {
                self.break_word();
            } else {
                let glyph = self.place_glyph(&trm, w0, font.ascent, font.descent, decoded);
                self.push_glyph(glyph);
            }

            let mut advance = w0 * text.size + text.char_spacing;
            if is_space {
                advance += text.word_spacing;
            }
            *tm = Matrix::translate(advance * text.horizontal_scaling, 0.0).multiply(tm);
        }
    }

    fn place_glyph(&self, trm: &Matrix, w0: f32, ascent: f32, descent: f32, text: String) -> Glyph {
        let (low, high) = (descent / 1000.0, ascent / 1000.0);
        let corners = [(0.0, low), (w0, low), (0.0, high), (w0, high)].map(|(x, y)| {
            let (px, py) = trm.transform(x, y);
            self.frame.to_local(px, py)
        });

        let mut glyph = Glyph {
            text,
            left: f32::INFINITY,
            top: f32::INFINITY,
            right: f32::NEG_INFINITY,
            bottom: f32::NEG_INFINITY,
        };
        for corner in corners {
            glyph.left = glyph.left.min(corner.x);
            glyph.right = glyph.right.max(corner.x);
            glyph.top = glyph.top.min(corner.y);
            glyph.bottom = glyph.bottom.max(corner.y);
        }
        glyph
    }

    fn push_glyph(&mut self, glyph: Glyph) {
        if let Some(word) = &self.pending {
            let height = glyph.height().max(word.bottom - word.top);
            let word_center = (word.top + word.bottom) / 2.0;
            let gap = glyph.left - word.right;
            let same_line = (glyph.center_y() - word_center).abs() < height / 2.0;

            if !same_line || gap > WORD_GAP_RATIO * height || gap < -BACKTRACK_RATIO * height {
                self.break_word();
            }
        }

        match &mut self.pending {
            Some(word) => {
                word.text.push_str(&glyph.text);
                word.left = word.left.min(glyph.left);
                word.top = word.top.min(glyph.top);
                word.right = word.right.max(glyph.right);
                word.bottom = word.bottom.max(glyph.bottom);
            }
            None => {
                self.pending = Some(Word {
                    left: glyph.left,
                    top: glyph.top,
                    right: glyph.right,
                    bottom: glyph.bottom,
                    text: glyph.text,
                });
            }
        }
    }

    fn break_word(&mut self) {
        if let Some(word) = self.pending.take() {
            if !word.text.trim().is_empty() {
                self.words.push(word);
            }
        }
    }
}

fn operand_matrix(operands: &[Object]) -> Option<Matrix> {
    let values: Option<Vec<f32>> = operands.iter().map(number).collect();
    Matrix::from_slice(&values?)
}
