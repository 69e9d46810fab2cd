//! Layout data types
//!
//! Coordinates are page-local: origin at the top-left corner of the media
//! box, x grows to the right, y grows downwards.

use crate::types::Color;

/// A point in page-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from its edges
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Top-left corner
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Shrink by `amount` on all four sides
    pub fn inset(&self, amount: f32) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            self.width - 2.0 * amount,
            self.height - 2.0 * amount,
        )
    }

    /// True when the rectangle has positive width and height
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// A word of body text and its bounding box
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub text: String,
}

impl Word {
    /// Top-left corner, the point connectors attach to
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }
}

/// An annotation already present in the document that gets a margin note
#[derive(Debug, Clone, PartialEq)]
pub struct SourceAnnotation {
    /// Position in the page's `/Annots` array
    pub index: usize,
    /// Annotation subtype (`Text`, `Highlight`, ...)
    pub subtype: String,
    /// Geometry of the annotation
    pub vertices: Vec<Point>,
    /// Comment text
    pub content: String,
    /// Stroke color, reused for the connector
    pub color: Color,
}

impl SourceAnnotation {
    /// Smallest distance from the page origin to any vertex
    pub fn origin_distance(&self) -> f32 {
        self.vertices
            .iter()
            .map(|vertex| vertex.distance(Point::default()))
            .fold(f32::INFINITY, f32::min)
    }
}

/// One straight connector piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// Everything needed to render one margin note
#[derive(Debug, Clone, PartialEq)]
pub struct NotePlacement {
    /// Index of the source annotation in the page's `/Annots` array
    pub source_index: usize,
    /// Subtype of the source annotation
    pub subtype: String,
    /// Connector origin on the source annotation
    pub anchor: Point,
    /// Padded note box
    pub note_rect: Rect,
    /// Area actually covered by the wrapped note text
    pub text_extent: Rect,
    /// Note text, wrapped to the note box width
    pub lines: Vec<String>,
    /// Unwrapped note text
    pub content: String,
    /// Connector color
    pub color: Color,
    /// Left x of the second text column the connector detours around
    pub column_x: Option<i64>,
    /// Connector pieces, in drawing order
    pub segments: Vec<Segment>,
}

/// Layout result for one page
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    /// 1-based page number
    pub page_number: u32,
    /// Page geometry after expansion
    pub frame: super::PageFrame,
    /// Initial margin rectangle (None when the page has no text)
    pub margin: Option<Rect>,
    /// Notes in placement order
    pub notes: Vec<NotePlacement>,
}
