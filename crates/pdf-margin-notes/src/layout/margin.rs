//! Page expansion and margin bookkeeping

use super::frame::PageFrame;
use super::types::{Rect, Word};

/// Result of widening a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageExpansion {
    /// Media box before expansion
    pub original: PageFrame,
    /// Media box after expansion
    pub expanded: PageFrame,
    /// Blank area right of the body text, `None` when the page has no words
    pub margin: Option<Rect>,
}

/// Widen a page by `expand_ratio` of its width and find the initial margin.
///
/// The margin starts at the rightmost extent of any word so it never covers
/// body text, and runs to the new right edge over the full page height.
pub fn expand_page(frame: PageFrame, words: &[Word], expand_ratio: f32) -> PageExpansion {
    let expanded = frame.expanded(expand_ratio);
    let margin = words
        .iter()
        .map(|word| word.right)
        .reduce(f32::max)
        .map(|text_right| Rect::from_edges(text_right, 0.0, expanded.width(), expanded.height()));

    PageExpansion {
        original: frame,
        expanded,
        margin,
    }
}

/// Margin space already taken by placed notes on one page, in placement order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarginLedger {
    occupied: Vec<Rect>,
}

impl MarginLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the area covered by a placed note
    pub fn record(&mut self, rect: Rect) {
        self.occupied.push(rect);
    }

    /// Lowest bottom edge among the occupied areas
    pub fn lowest_bottom(&self) -> Option<f32> {
        self.occupied.iter().map(Rect::bottom).reduce(f32::max)
    }

    /// The part of `margin` still available for the next note: everything
    /// below the lowest occupied area, or the whole margin when nothing is
    /// placed yet.
    pub fn note_area(&self, margin: &Rect) -> Rect {
        match self.lowest_bottom() {
            Some(bottom) => {
                let top = bottom.max(margin.y);
                Rect::from_edges(margin.x, top, margin.right(), margin.bottom())
            }
            None => *margin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(left: f32, right: f32) -> Word {
        Word {
            left,
            top: 90.0,
            right,
            bottom: 102.0,
            text: "w".to_string(),
        }
    }

    #[test]
    fn test_expand_page_margin_starts_at_text_edge() {
        let frame = PageFrame::new(0.0, 0.0, 600.0, 800.0);
        let words = vec![word(60.0, 120.0), word(130.0, 300.0), word(60.0, 250.0)];
        let expansion = expand_page(frame, &words, 0.3);

        assert_eq!(expansion.expanded.width(), 780.0);
        assert_eq!(
            expansion.margin,
            Some(Rect::new(300.0, 0.0, 480.0, 800.0))
        );
    }

    #[test]
    fn test_expand_page_without_words_has_no_margin() {
        let frame = PageFrame::new(0.0, 0.0, 600.0, 800.0);
        let expansion = expand_page(frame, &[], 0.3);
        assert_eq!(expansion.expanded.width(), 780.0);
        assert!(expansion.margin.is_none());
    }

    #[test]
    fn test_note_area_stacks_below_lowest_note() {
        let margin = Rect::new(300.0, 0.0, 480.0, 800.0);
        let mut ledger = MarginLedger::new();
        assert_eq!(ledger.note_area(&margin), margin);

        ledger.record(Rect::new(324.0, 24.0, 432.0, 40.0));
        ledger.record(Rect::new(324.0, 88.0, 432.0, 30.0));
        ledger.record(Rect::new(324.0, 50.0, 432.0, 10.0));

        assert_eq!(ledger.lowest_bottom(), Some(118.0));
        assert_eq!(
            ledger.note_area(&margin),
            Rect::new(300.0, 118.0, 480.0, 682.0)
        );
    }
}
