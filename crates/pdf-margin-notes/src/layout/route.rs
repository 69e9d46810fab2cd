//! Note placement and connector routing

use std::collections::HashMap;

use super::margin::MarginLedger;
use super::types::{Point, Rect, Segment, Word};

/// Vertex closest to the top-right corner `(page_right, 0)`.
///
/// Returns `None` for an empty vertex list. On ties the first vertex wins.
pub fn select_anchor(vertices: &[Point], page_right: f32) -> Option<Point> {
    let corner = Point::new(page_right, 0.0);
    nearest_by(vertices.iter().copied(), |vertex| vertex.distance(corner))
}

/// A vertical run of word starts to the right of an anchor
#[derive(Debug, Clone, PartialEq)]
pub struct Column<'a> {
    /// Truncated left x shared by the column's words
    pub x: i64,
    /// Words starting at `x`, in page order
    pub words: Vec<&'a Word>,
}

/// Detect a second text column right of `anchor`.
///
/// Looks at every word starting strictly right of the anchor, truncates the
/// left edges to integers and takes the most frequent value. Among equally
/// frequent values the one seen first in page order wins. A column at
/// x = 0 is treated as no column.
pub fn detect_column(words: &[Word], anchor: Point) -> Option<Column<'_>> {
    let right_words: Vec<&Word> = words.iter().filter(|word| word.left > anchor.x).collect();

    let mut counts: HashMap<i64, usize> = HashMap::new();
    for word in &right_words {
        *counts.entry(word.left as i64).or_default() += 1;
    }
    let max_count = counts.values().copied().max()?;

    let x = right_words
        .iter()
        .map(|word| word.left as i64)
        .find(|x| counts[x] == max_count)?;
    if x == 0 {
        return None;
    }

    Some(Column {
        x,
        words: right_words
            .into_iter()
            .filter(|word| word.left as i64 == x)
            .collect(),
    })
}

/// Padded note box for the next note, or `None` when the remaining margin is
/// too small to hold one.
pub fn place_note(margin: &Rect, ledger: &MarginLedger, padding: f32) -> Option<Rect> {
    let note = ledger.note_area(margin).inset(padding);
    note.is_valid().then_some(note)
}

/// The column word whose start is closest to being equidistant from the
/// anchor and the note box corner.
pub fn choose_bend<'a>(column: &Column<'a>, anchor: Point, note_origin: Point) -> Option<&'a Word> {
    nearest_by(column.words.iter().copied(), |word| {
        (word.origin().distance(anchor) - word.origin().distance(note_origin)).abs()
    })
}

/// Connector from `anchor` to the note box.
///
/// Without a column the connector goes straight to the note corner. With a
/// column it bends at the chosen column word, runs horizontally to the margin
/// edge, then to the note corner. Both end with a short horizontal stub
/// along the top of the note box.
pub fn route_connector(
    anchor: Point,
    column: Option<&Column<'_>>,
    margin: &Rect,
    note: &Rect,
    stub_length: f32,
) -> Vec<Segment> {
    let corner = note.origin();
    let stub = Segment::new(corner, Point::new(corner.x + stub_length, corner.y));

    let bend = column.and_then(|column| choose_bend(column, anchor, corner));
    match bend {
        Some(word) => {
            let bend = word.origin();
            let margin_edge = Point::new(margin.x, bend.y);
            vec![
                Segment::new(anchor, bend),
                Segment::new(bend, margin_edge),
                Segment::new(margin_edge, corner),
                stub,
            ]
        }
        None => vec![Segment::new(anchor, corner), stub],
    }
}

/// First item with the smallest key
fn nearest_by<T>(items: impl IntoIterator<Item = T>, key: impl Fn(&T) -> f32) -> Option<T> {
    let mut best: Option<(f32, T)> = None;
    for item in items {
        let distance = key(&item);
        if best.as_ref().is_none_or(|(best_distance, _)| distance < *best_distance) {
            best = Some((distance, item));
        }
    }
    best.map(|(_, item)| item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(left: f32, top: f32) -> Word {
        Word {
            left,
            top,
            right: left + 40.0,
            bottom: top + 12.0,
            text: "word".to_string(),
        }
    }

    #[test]
    fn test_anchor_is_vertex_nearest_top_right() {
        let vertices = [
            Point::new(100.0, 100.0),
            Point::new(200.0, 100.0),
            Point::new(100.0, 200.0),
            Point::new(200.0, 200.0),
        ];
        assert_eq!(
            select_anchor(&vertices, 780.0),
            Some(Point::new(200.0, 100.0))
        );
        assert_eq!(select_anchor(&[], 780.0), None);
    }

    #[test]
    fn test_no_words_right_of_anchor_means_no_column() {
        let words = vec![word(60.0, 100.0), word(120.0, 100.0)];
        assert!(detect_column(&words, Point::new(590.0, 10.0)).is_none());
    }

    #[test]
    fn test_column_is_most_frequent_truncated_left() {
        let words = vec![
            word(60.0, 100.0),
            word(320.4, 100.0),
            word(372.0, 100.0),
            word(320.9, 120.0),
            word(320.0, 140.0),
            word(400.0, 140.0),
        ];
        let column = detect_column(&words, Point::new(100.0, 50.0)).unwrap();
        assert_eq!(column.x, 320);
        assert_eq!(column.words.len(), 3);
    }

    #[test]
    fn test_column_at_page_edge_is_ignored() {
        let words = vec![word(0.4, 100.0), word(0.8, 120.0), word(320.0, 140.0)];
        let anchor = Point::new(0.0, 50.0);
        assert!(detect_column(&words, anchor).is_none());

        let margin = Rect::new(300.0, 0.0, 480.0, 800.0);
        let note = Rect::new(324.0, 24.0, 432.0, 752.0);
        let column = detect_column(&words, anchor);
        let segments = route_connector(anchor, column.as_ref(), &margin, &note, 24.0);
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn test_column_tie_prefers_first_seen() {
        let words = vec![word(400.0, 100.0), word(320.0, 100.0)];
        let column = detect_column(&words, Point::new(100.0, 50.0)).unwrap();
        assert_eq!(column.x, 400);
    }

    #[test]
    fn test_place_note_pads_margin() {
        let margin = Rect::new(300.0, 0.0, 480.0, 800.0);
        let ledger = MarginLedger::new();
        assert_eq!(
            place_note(&margin, &ledger, 24.0),
            Some(Rect::new(324.0, 24.0, 432.0, 752.0))
        );
    }

    #[test]
    fn test_place_note_fails_when_margin_is_full() {
        let margin = Rect::new(300.0, 0.0, 480.0, 800.0);
        let mut ledger = MarginLedger::new();
        ledger.record(Rect::new(324.0, 24.0, 432.0, 740.0));
        assert_eq!(place_note(&margin, &ledger, 24.0), None);
    }

    #[test]
    fn test_route_without_column_has_two_segments() {
        let margin = Rect::new(300.0, 0.0, 480.0, 800.0);
        let note = Rect::new(324.0, 24.0, 432.0, 752.0);
        let anchor = Point::new(590.0, 10.0);

        let segments = route_connector(anchor, None, &margin, &note, 24.0);
        assert_eq!(
            segments,
            vec![
                Segment::new(anchor, Point::new(324.0, 24.0)),
                Segment::new(Point::new(324.0, 24.0), Point::new(348.0, 24.0)),
            ]
        );
    }

    #[test]
    fn test_route_with_column_detours_through_bend() {
        let words = vec![word(320.0, 100.0), word(320.0, 300.0), word(320.0, 600.0)];
        let column = detect_column(&words, Point::new(100.0, 50.0)).unwrap();
        let margin = Rect::new(360.0, 0.0, 420.0, 800.0);
        let note = Rect::new(384.0, 24.0, 372.0, 752.0);
        let anchor = Point::new(100.0, 50.0);

        let segments = route_connector(anchor, Some(&column), &margin, &note, 24.0);
        assert_eq!(segments.len(), 4);

        // (320, 600) is nearly as far from the anchor as from the note corner
        let bend = segments[0].end;
        assert_eq!(bend, Point::new(320.0, 600.0));
        assert_eq!(segments[1], Segment::new(bend, Point::new(360.0, 600.0)));
        assert_eq!(
            segments[2],
            Segment::new(Point::new(360.0, 600.0), Point::new(384.0, 24.0))
        );
        assert_eq!(
            segments[3],
            Segment::new(Point::new(384.0, 24.0), Point::new(408.0, 24.0))
        );
    }
}
