//! Page dictionary updates

use crate::layout::PageFrame;
use crate::types::Result;
use lopdf::{Document, Object, ObjectId};

/// Boxes that no longer describe the expanded page
const STALE_BOXES: [&[u8]; 3] = [b"TrimBox", b"BleedBox", b"ArtBox"];

/// Replace the page's MediaBox and CropBox with `frame`.
///
/// Set directly on the page so inherited boxes from the pages tree don't
/// apply anymore.
pub(crate) fn set_page_boxes(doc: &mut Document, page_id: ObjectId, frame: &PageFrame) -> Result<()> {
    let page = doc.get_dictionary_mut(page_id)?;
    let bounds = Object::Array(frame.as_array().into_iter().map(Object::Real).collect());

    page.set("MediaBox", bounds.clone());
    page.set("CropBox", bounds);
    for key in STALE_BOXES {
        page.remove(key);
    }
    Ok(())
}

/// Add an annotation reference to the page's `/Annots` array, which may be
/// inline, an indirect object, or missing.
pub(crate) fn append_annotation(
    doc: &mut Document,
    page_id: ObjectId,
    annotation_id: ObjectId,
) -> Result<()> {
    let indirect = match doc.get_dictionary(page_id)?.get(b"Annots") {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    };

    if let Some(array_id) = indirect {
        if let Ok(Object::Array(items)) = doc.get_object_mut(array_id) {
            items.push(Object::Reference(annotation_id));
            return Ok(());
        }
    }

    let page = doc.get_dictionary_mut(page_id)?;
    let has_inline_array = matches!(page.get(b"Annots"), Ok(Object::Array(_)));
    if has_inline_array {
        if let Ok(Object::Array(items)) = page.get_mut(b"Annots") {
            items.push(Object::Reference(annotation_id));
        }
    } else {
        page.set(
            "Annots",
            Object::Array(vec![Object::Reference(annotation_id)]),
        );
    }
    Ok(())
}
