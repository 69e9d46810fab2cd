//! Reading pages: geometry, body-text words and source annotations
//!
//! This is the read side of the lopdf boundary. Nothing in here mutates the
//! document.

mod annotations;
mod fonts;
mod matrix;
mod page;
mod text;

pub use annotations::{has_annotations, read_source_annotations};
pub use page::page_frame;
pub use text::extract_words;

pub(crate) use annotations::next_run;

use lopdf::{Dictionary, Document, Object};

/// Follow a reference, leaving direct objects untouched
pub(crate) fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

/// Resolve an object to a dictionary (a stream's dictionary counts)
pub(crate) fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match resolve(doc, object) {
        Object::Dictionary(dict) => Some(dict),
        Object::Stream(stream) => Some(&stream.dict),
        _ => None,
    }
}

/// Look up `key` in `dict` and resolve the value
pub(crate) fn get_resolved<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    dict.get(key).ok().map(|object| resolve(doc, object))
}

/// Numeric value of an integer or real object
pub(crate) fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value),
        _ => None,
    }
}

/// All numbers of an array, resolving references along the way.
/// Returns `None` if the object is not an array or holds a non-number.
pub(crate) fn numbers(doc: &Document, object: &Object) -> Option<Vec<f32>> {
    match resolve(doc, object) {
        Object::Array(items) => items
            .iter()
            .map(|item| number(resolve(doc, item)))
            .collect(),
        _ => None,
    }
}

/// Name value as a string
pub(crate) fn name_str(object: &Object) -> Option<String> {
    match object {
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}
