//! Source annotation reading

use crate::constants::NOTE_NAME_PREFIX;
use crate::layout::{PageFrame, Point, SourceAnnotation};
use crate::types::{Color, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};

use super::{get_resolved, name_str, numbers, resolve, resolve_dict};

/// Annotation subtypes that never get a margin note
const SKIPPED_SUBTYPES: [&str; 3] = ["Link", "Widget", "Popup"];

/// True when any page carries an annotation that would get a margin note
pub fn has_annotations(doc: &Document) -> bool {
    doc.get_pages().values().any(|&page_id| {
        page_annotations(doc, page_id)
            .map(|annotations| {
                annotations
                    .iter()
                    .any(|(_, dict)| is_source_annotation(doc, dict))
            })
            .unwrap_or(false)
    })
}

/// Read the annotations of a page that should become margin notes.
///
/// Geometry is converted to page-local coordinates with `frame`.
pub fn read_source_annotations(
    doc: &Document,
    page_id: ObjectId,
    frame: &PageFrame,
) -> Result<Vec<SourceAnnotation>> {
    let annotations = page_annotations(doc, page_id)?
        .into_iter()
        .filter(|(_, dict)| is_source_annotation(doc, dict))
        .map(|(index, dict)| SourceAnnotation {
            index,
            subtype: subtype(doc, dict).unwrap_or_default(),
            vertices: vertices(doc, dict, frame),
            content: content(doc, dict),
            color: stroke_color(doc, dict),
        })
        .collect();
    Ok(annotations)
}

/// All annotation dictionaries of a page with their `/Annots` position
pub(crate) fn page_annotations(
    doc: &Document,
    page_id: ObjectId,
) -> Result<Vec<(usize, &Dictionary)>> {
    let page = doc.get_dictionary(page_id)?;
    let Some(Object::Array(items)) = get_resolved(doc, page, b"Annots") else {
        return Ok(Vec::new());
    };

    Ok(items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| resolve_dict(doc, item).map(|dict| (index, dict)))
        .collect())
}

/// `/NM` of an annotation written by this crate
fn created_name(doc: &Document, dict: &Dictionary) -> Option<String> {
    get_resolved(doc, dict, b"NM")
        .and_then(text_value)
        .filter(|name| name.starts_with(NOTE_NAME_PREFIX))
}

fn is_created_annotation(doc: &Document, dict: &Dictionary) -> bool {
    created_name(doc, dict).is_some()
}

/// Run number for the next conversion of `doc`.
///
/// Names look like `margin-note-r{run}-p{page}-{n}`; notes without a run
/// component count as run 0.
pub(crate) fn next_run(doc: &Document) -> u32 {
    let run_of = |name: &str| {
        name[NOTE_NAME_PREFIX.len()..]
            .strip_prefix("-r")
            .and_then(|rest| rest.split('-').next())
            .and_then(|run| run.parse::<u32>().ok())
            .unwrap_or(0)
    };

    doc.get_pages()
        .values()
        .filter_map(|&page_id| page_annotations(doc, page_id).ok())
        .flatten()
        .filter_map(|(_, dict)| created_name(doc, dict))
        .map(|name| run_of(&name) + 1)
        .max()
        .unwrap_or(1)
}

fn is_source_annotation(doc: &Document, dict: &Dictionary) -> bool {
    let skipped = subtype(doc, dict)
        .is_some_and(|subtype| SKIPPED_SUBTYPES.contains(&subtype.as_str()));
    !skipped && !is_created_annotation(doc, dict)
}

fn subtype(doc: &Document, dict: &Dictionary) -> Option<String> {
    get_resolved(doc, dict, b"Subtype").and_then(name_str)
}

/// Annotation geometry, most specific source first: `/Vertices`,
/// `/QuadPoints`, `/InkList`, `/L`, then the corners of `/Rect`.
fn vertices(doc: &Document, dict: &Dictionary, frame: &PageFrame) -> Vec<Point> {
    let to_points = |values: Vec<f32>| -> Vec<Point> {
        values
            .chunks_exact(2)
            .map(|pair| frame.to_local(pair[0], pair[1]))
            .collect()
    };

    let flat = |key: &[u8]| get_resolved(doc, dict, key).and_then(|value| numbers(doc, value));
    let ink = || match get_resolved(doc, dict, b"InkList") {
        Some(Object::Array(strokes)) => Some(
            strokes
                .iter()
                .filter_map(|stroke| numbers(doc, stroke))
                .flatten()
                .collect::<Vec<f32>>(),
        ),
        _ => None,
    };

    let candidates = [
        flat(b"Vertices"),
        flat(b"QuadPoints"),
        ink(),
        flat(b"L"),
    ];
    if let Some(values) = candidates
        .into_iter()
        .flatten()
        .find(|values| values.len() >= 2)
    {
        return to_points(values);
    }

    match get_resolved(doc, dict, b"Rect").and_then(|value| numbers(doc, value)) {
        Some(values) if values.len() == 4 => {
            let (llx, urx) = (values[0].min(values[2]), values[0].max(values[2]));
            let (lly, ury) = (values[1].min(values[3]), values[1].max(values[3]));
            vec![
                frame.to_local(llx, ury),
                frame.to_local(urx, ury),
                frame.to_local(llx, lly),
                frame.to_local(urx, lly),
            ]
        }
        _ => Vec::new(),
    }
}

fn content(doc: &Document, dict: &Dictionary) -> String {
    match get_resolved(doc, dict, b"Contents") {
        Some(object) => text_value(object).unwrap_or_default(),
        None => String::new(),
    }
}

/// `/C` as RGB; missing or empty (transparent) colors fall back to black
fn stroke_color(doc: &Document, dict: &Dictionary) -> Color {
    dict.get(b"C")
        .ok()
        .and_then(|value| numbers(doc, resolve(doc, value)))
        .and_then(|components| Color::from_components(&components))
        .unwrap_or_default()
}

/// Decode a text string object; malformed UTF-16 decodes lossily
fn text_value(object: &Object) -> Option<String> {
    let text = match lopdf::decode_text_string(object) {
        Ok(text) => text,
        Err(_) => {
            let bytes = object.as_str().ok()?;
            let units: Vec<u16> = bytes
                .strip_prefix(&[0xFE, 0xFF])?
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
    };
    Some(text.trim_start_matches('\u{FEFF}').to_string())
}
