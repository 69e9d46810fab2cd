//! Font metrics needed to measure shown text

use std::collections::HashMap;

use crate::constants::{COURIER_GLYPH_WIDTH, HELVETICA_ASCENT, HELVETICA_DESCENT};
use crate::layout::helvetica_width;
use lopdf::{Dictionary, Document, Encoding, Object};

use super::{get_resolved, name_str, number, numbers, resolve, resolve_dict};

/// `/W` ranges wider than this are ignored
const MAX_WIDTH_RANGE: i64 = 0x1_0000;

#[derive(Debug, Clone, Copy, PartialEq)]
enum StandardFamily {
    Courier,
    Proportional,
}

/// Widths, vertical extent and decoding for one font resource
#[derive(Debug)]
pub(crate) struct FontMetrics<'a> {
    composite: bool,
    first_char: u32,
    widths: Vec<f32>,
    cid_widths: HashMap<u32, f32>,
    missing_width: Option<f32>,
    default_width: f32,
    family: StandardFamily,
    /// Glyph space to 1/1000 text space, only differs for Type3 fonts
    width_scale: f32,
    pub ascent: f32,
    pub descent: f32,
    encoding: Option<Encoding<'a>>,
}

impl<'a> FontMetrics<'a> {
    /// Helvetica, used when a font can't be resolved
    pub fn fallback() -> Self {
        Self {
            composite: false,
            first_char: 0,
            widths: Vec::new(),
            cid_widths: HashMap::new(),
            missing_width: None,
            default_width: 1000.0,
            family: StandardFamily::Proportional,
            width_scale: 1.0,
            ascent: HELVETICA_ASCENT,
            descent: HELVETICA_DESCENT,
            encoding: None,
        }
    }

    pub fn load(doc: &'a Document, font: &'a Dictionary) -> Self {
        let mut metrics = Self::fallback();
        let subtype = get_resolved(doc, font, b"Subtype").and_then(name_str);
        let base_font = get_resolved(doc, font, b"BaseFont")
            .and_then(name_str)
            .unwrap_or_default();
        if base_font.contains("Courier") {
            metrics.family = StandardFamily::Courier;
        }

        let descriptor_owner = if subtype.as_deref() == Some("Type0") {
            metrics.composite = true;
            let descendant = get_resolved(doc, font, b"DescendantFonts")
                .and_then(|fonts| match fonts {
                    Object::Array(items) => items.first(),
                    _ => None,
                })
                .and_then(|first| resolve_dict(doc, first));

            if let Some(descendant) = descendant {
                if let Some(dw) = get_resolved(doc, descendant, b"DW").and_then(number) {
                    metrics.default_width = dw;
                }
                if let Some(Object::Array(w)) = get_resolved(doc, descendant, b"W") {
                    metrics.cid_widths = parse_cid_widths(doc, w);
                }
            }
            descendant
        } else {
            metrics.first_char = get_resolved(doc, font, b"FirstChar")
                .and_then(number)
                .map_or(0, |first| first.max(0.0) as u32);
            metrics.widths = get_resolved(doc, font, b"Widths")
                .and_then(|widths| numbers(doc, widths))
                .unwrap_or_default();

            if subtype.as_deref() == Some("Type3") {
                if let Some(matrix) =
                    get_resolved(doc, font, b"FontMatrix").and_then(|m| numbers(doc, m))
                {
                    if let Some(&scale) = matrix.first() {
                        metrics.width_scale = scale * 1000.0;
                    }
                }
            }
            Some(font)
        };

        if let Some(descriptor) = descriptor_owner
            .and_then(|owner| get_resolved(doc, owner, b"FontDescriptor"))
            .and_then(|descriptor| descriptor.as_dict().ok())
        {
            let value = |key: &[u8]| get_resolved(doc, descriptor, key).and_then(number);
            if let Some(ascent) = value(b"Ascent").filter(|a| *a != 0.0) {
                metrics.ascent = ascent;
            }
            if let Some(descent) = value(b"Descent").filter(|d| *d != 0.0) {
                metrics.descent = descent;
            }
            metrics.missing_width = value(b"MissingWidth");
        }

        // Without either key lopdf would assume StandardEncoding
        if font.has(b"Encoding") || font.has(b"ToUnicode") {
            metrics.encoding = match font.get_font_encoding(doc) {
                Ok(encoding) => Some(encoding),
                Err(err) => {
                    log::debug!("Font {base_font}: no usable encoding ({err})");
                    None
                }
            };
        }

        metrics
    }

    /// True when every character code is a single byte
    pub fn is_single_byte(&self) -> bool {
        !self.composite
    }

    /// Split shown bytes into character codes
    pub fn codes(&self, bytes: &[u8]) -> Vec<u32> {
        if self.composite {
            bytes
                .chunks(2)
                .map(|pair| ((pair[0] as u32) << 8) | pair.get(1).copied().unwrap_or(0) as u32)
                .collect()
        } else {
            bytes.iter().map(|&b| b as u32).collect()
        }
    }

    /// Advance width of a code in 1/1000 text space units
    pub fn width(&self, code: u32) -> f32 {
        if self.composite {
            return self
                .cid_widths
                .get(&code)
                .copied()
                .unwrap_or(self.default_width);
        }

        let listed = code
            .checked_sub(self.first_char)
            .and_then(|index| self.widths.get(index as usize));
        if let Some(&width) = listed {
            return width * self.width_scale;
        }
        if let Some(missing) = self.missing_width.filter(|w| *w > 0.0) {
            return missing;
        }
        match self.family {
            StandardFamily::Courier => COURIER_GLYPH_WIDTH,
            StandardFamily::Proportional => {
                helvetica_width(char::from_u32(code).unwrap_or(' '))
            }
        }
    }

    /// Unicode text for a code
    pub fn decode(&self, code: u32) -> String {
        let bytes = if self.composite {
            vec![(code >> 8) as u8, code as u8]
        } else {
            vec![code as u8]
        };
        let mapped = self
            .encoding
            .as_ref()
            .and_then(|encoding| encoding.bytes_to_string(&bytes).ok())
            .filter(|text| !text.is_empty() && text != "\u{FFFD}");
        if let Some(text) = mapped {
            return text;
        }
        if self.composite {
            return '\u{FFFD}'.to_string();
        }
        char::from_u32(code).map(String::from).unwrap_or_default()
    }
}

/// Parse a CIDFont `/W` array: `c [w1 w2 ...]` and `c_first c_last w` entries
fn parse_cid_widths(doc: &Document, w: &[Object]) -> HashMap<u32, f32> {
    let mut widths = HashMap::new();
    let mut i = 0;

    while i < w.len() {
        let Some(first) = number(resolve(doc, &w[i])).map(|n| n as i64) else {
            break;
        };
        match w.get(i + 1).map(|next| resolve(doc, next)) {
            Some(Object::Array(list)) => {
                for (offset, width) in list.iter().enumerate() {
                    if let Some(width) = number(resolve(doc, width)) {
                        widths.insert((first + offset as i64) as u32, width);
                    }
                }
                i += 2;
            }
            Some(last) => {
                let last = number(last).map(|n| n as i64);
                let width = w.get(i + 2).and_then(|width| number(resolve(doc, width)));
                if let (Some(last), Some(width)) = (last, width) {
                    if last >= first && last - first < MAX_WIDTH_RANGE {
                        for code in first..=last {
                            widths.insert(code as u32, width);
                        }
                    }
                }
                i += 3;
            }
            None => break,
        }
    }

    widths
}
