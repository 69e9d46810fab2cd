use crate::constants::{DEFAULT_PAGE_HEIGHT_PT, DEFAULT_PAGE_WIDTH_PT};
use crate::layout::PageFrame;
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId};

use super::{get_resolved, numbers};

/// Pages trees deeper than this are treated as malformed
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Look up a page attribute, walking up the pages tree for inheritable keys
pub(crate) fn inherited<'a>(
    doc: &'a Document,
    page: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node = page;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        if let Some(value) = get_resolved(doc, node, key) {
            return Some(value);
        }
        node = get_resolved(doc, node, b"Parent")?.as_dict().ok()?;
    }
    None
}

/// Resource dictionary in effect for a page
pub(crate) fn page_resources<'a>(doc: &'a Document, page: &'a Dictionary) -> Option<&'a Dictionary> {
    inherited(doc, page, b"Resources")?.as_dict().ok()
}

/// Visible area of a page: the crop box when present, else the media box.
///
/// Pages without any box fall back to US Letter.
pub fn page_frame(doc: &Document, page_id: ObjectId) -> Result<PageFrame> {
    let page = doc.get_dictionary(page_id)?;

    let visible = [b"CropBox".as_slice(), b"MediaBox".as_slice()]
        .into_iter()
        .filter_map(|key| inherited(doc, page, key))
        .filter_map(|value| numbers(doc, value))
        .find(|values| values.len() == 4);

    match visible {
        Some(values) => Ok(PageFrame::new(values[0], values[1], values[2], values[3])),
        None => {
            log::warn!(
                "Page {:?} has no usable MediaBox, assuming US Letter",
                page_id
            );
            Ok(PageFrame::new(
                0.0,
                0.0,
                DEFAULT_PAGE_WIDTH_PT,
                DEFAULT_PAGE_HEIGHT_PT,
            ))
        }
    }
}
