//! Helvetica metrics and note text wrapping

use crate::constants::{DEFAULT_GLYPH_WIDTH, LINE_HEIGHT_FACTOR, TEXT_INSET};

use super::types::Rect;

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 32-47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 48-63
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 64-79
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 80-95
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 96-111
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 112-126
];

/// Advance width of a character in Helvetica, in 1/1000 em
pub fn helvetica_width(ch: char) -> f32 {
    let code = ch as u32;
    if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize] as f32
    } else {
        DEFAULT_GLYPH_WIDTH
    }
}

/// Width of a string set in Helvetica at `font_size`
pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(helvetica_width).sum::<f32>() * font_size / 1000.0
}

/// Baseline-to-baseline distance for `font_size`
pub fn line_height(font_size: f32) -> f32 {
    font_size * LINE_HEIGHT_FACTOR
}

/// Greedy word wrap.
///
/// Explicit line breaks are kept, runs of spaces collapse, and words wider
/// than `max_width` are broken between characters.
pub fn wrap_text(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.replace("\r\n", "\n").replace('\r', "\n").split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if text_width(&candidate, font_size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if text_width(word, font_size) <= max_width {
                current = word.to_string();
            } else {
                for ch in word.chars() {
                    current.push(ch);
                    if current.chars().count() > 1 && text_width(&current, font_size) > max_width {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(ch);
                    }
                }
            }
        }

        lines.push(current);
    }

    // Trailing blank lines add nothing visible
    while lines.len() > 1 && lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Area covered by `line_count` lines of text set at the top of `note_rect`,
/// never taller than the note box itself.
pub fn text_extent(note_rect: &Rect, line_count: usize, font_size: f32) -> Rect {
    let height = line_count.max(1) as f32 * line_height(font_size) + 2.0 * TEXT_INSET;
    Rect::new(
        note_rect.x,
        note_rect.y,
        note_rect.width,
        height.min(note_rect.height),
    )
}
