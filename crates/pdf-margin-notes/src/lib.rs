mod constants;
pub mod extract;
pub mod layout;
mod options;
pub mod printable;
mod render;
mod stats;
mod types;

pub use constants::*;
pub use extract::{extract_words, has_annotations, page_frame, read_source_annotations};
pub use layout::*;
pub use options::*;
pub use printable::{
    apply_plans, convert_file, load_pdf, make_printable, plan_document, printable_path, save_pdf,
};
pub use stats::{calculate_statistics, summarize_plans};
pub use types::*;
