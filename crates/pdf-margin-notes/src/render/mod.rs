//! Writing margin notes into the document
//!
//! This is the only part of the crate that mutates a `Document`:
//! - Replacing a page's boxes with the expanded frame
//! - Creating free-text and line annotations with appearance streams
//! - Attaching annotations to a page

mod annotation;
mod page;

pub(crate) use annotation::{NoteResources, free_text_annotation, line_annotation};
pub(crate) use page::{append_annotation, set_page_boxes};
