use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrintableError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("This PDF has no annotations.")]
    NoAnnotations,
    #[error("Page {page} has annotations but no extractable text to size the margin from")]
    NoText { page: u32 },
    #[error("Annotation {index} on page {page} has no geometry")]
    MissingGeometry { page: u32, index: usize },
    #[error("No margin space left for another note on page {page}")]
    MarginExhausted { page: u32 },
}

pub type Result<T> = std::result::Result<T, PrintableError>;

/// RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a PDF color array (gray, RGB or CMYK).
    /// Any other component count yields `None`.
    pub fn from_components(components: &[f32]) -> Option<Self> {
        match *components {
            [gray] => Some(Self::new(gray, gray, gray)),
            [r, g, b] => Some(Self::new(r, g, b)),
            [c, m, y, k] => Some(Self::new(
                (1.0 - c) * (1.0 - k),
                (1.0 - m) * (1.0 - k),
                (1.0 - y) * (1.0 - k),
            )),
            _ => None,
        }
    }

    pub fn components(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// One source annotation as seen by the planner
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationSummary {
    /// Index in the page's `/Annots` array
    pub index: usize,
    pub subtype: String,
    /// First characters of the annotation text
    pub preview: String,
    /// Connector origin, page-local top-left coordinates
    pub anchor: (f32, f32),
}

/// Per-page counts gathered while planning a conversion
#[derive(Debug, Clone, PartialEq)]
pub struct PageStatistics {
    /// 1-based page number
    pub page_number: u32,
    /// Source annotations in placement order
    pub annotations: Vec<AnnotationSummary>,
    /// Note boxes that will be added
    pub notes_added: usize,
    /// Connector line segments that will be added
    pub lines_added: usize,
    /// Notes whose connector detours around a second text column
    pub column_detours: usize,
}

/// Statistics about a conversion, computed without touching the document
#[derive(Debug, Clone, PartialEq)]
pub struct PrintableStatistics {
    /// Total number of pages
    pub pages: usize,
    /// Pages carrying at least one source annotation
    pub annotated_pages: usize,
    /// Total source annotations
    pub source_annotations: usize,
    /// Total note boxes to be added
    pub notes_added: usize,
    /// Total line annotations to be added
    pub lines_added: usize,
    /// Breakdown for annotated pages
    pub per_page: Vec<PageStatistics>,
}
