//! Page geometry and coordinate conversion

use super::types::{Point, Rect};

/// A page's media box in PDF user space.
///
/// Converts between PDF user space (origin bottom-left) and the page-local
/// top-left space used by the layout code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFrame {
    pub llx: f32,
    pub lly: f32,
    pub urx: f32,
    pub ury: f32,
}

impl PageFrame {
    /// Build a frame from two opposite corners in any order
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            llx: x0.min(x1),
            lly: y0.min(y1),
            urx: x0.max(x1),
            ury: y0.max(y1),
        }
    }

    pub fn width(&self) -> f32 {
        self.urx - self.llx
    }

    pub fn height(&self) -> f32 {
        self.ury - self.lly
    }

    /// The whole page in local coordinates
    /// Widen the frame on the right by `ratio` of its current width.
    /// The top-left corner stays put, so local coordinates stay valid.
    pub fn expanded(&self, ratio: f32) -> PageFrame {
        PageFrame {
            urx: self.urx + self.width() * ratio,
            ..*self
        }
    }

    /// PDF user space to local
    pub fn to_local(&self, x: f32, y: f32) -> Point {
        Point::new(x - self.llx, self.ury - y)
    }

    /// Local to PDF user space
    pub fn to_pdf(&self, point: Point) -> (f32, f32) {
        (point.x + self.llx, self.ury - point.y)
    }

    /// Local rectangle to a PDF `[llx lly urx ury]` quadruple
    pub fn rect_to_pdf(&self, rect: &Rect) -> [f32; 4] {
        let (left, top) = self.to_pdf(rect.origin());
        let (right, bottom) = self.to_pdf(Point::new(rect.right(), rect.bottom()));
        [left, bottom, right, top]
    }

    pub fn as_array(&self) -> [f32; 4] {
        [self.llx, self.lly, self.urx, self.ury]
    }
}
