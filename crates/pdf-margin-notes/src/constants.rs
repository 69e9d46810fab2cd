//! Shared constants for margin-note layout
//!
//! All lengths are in PDF points.

// =============================================================================
// Layout Defaults
// =============================================================================

/// Fraction of the original page width added on the right
pub const DEFAULT_EXPAND_RATIO: f32 = 0.3;

/// Inset applied on every side of the note area
pub const DEFAULT_NOTE_PADDING: f32 = 24.0;

/// Length of the horizontal stub drawn at the note box corner
pub const DEFAULT_STUB_LENGTH: f32 = 24.0;

/// Font size of note text
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Stroke width of connector lines
pub const DEFAULT_LINE_WIDTH: f32 = 1.0;

// =============================================================================
// Note Text
// =============================================================================

/// Baseline-to-baseline distance as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Gap between the note box edge and its text
pub const TEXT_INSET: f32 = 2.0;

/// Resource name of the note font inside appearance streams
pub const NOTE_FONT_RESOURCE: &str = "Helv";

/// Prefix of the `/NM` entry of every annotation this crate creates
pub const NOTE_NAME_PREFIX: &str = "margin-note";

// =============================================================================
// Font Metrics (glyph space, 1/1000 em)
// =============================================================================

/// Helvetica ascender
pub const HELVETICA_ASCENT: f32 = 718.0;

/// Helvetica descender
pub const HELVETICA_DESCENT: f32 = -207.0;

/// Advance used for characters missing from the metrics tables
pub const DEFAULT_GLYPH_WIDTH: f32 = 556.0;

/// Advance of every Courier glyph
pub const COURIER_GLYPH_WIDTH: f32 = 600.0;

// =============================================================================
// Document Handling
// =============================================================================

/// Extension replacing the input's extension on the output file
pub const PRINTABLE_EXTENSION: &str = "printable.pdf";

/// Default page width in points (US Letter), used when a page has no MediaBox
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Form XObjects nested deeper than this are not searched for text
pub const MAX_FORM_DEPTH: usize = 8;
