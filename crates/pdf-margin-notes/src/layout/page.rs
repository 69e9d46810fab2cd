//! Per-page layout planning

use crate::constants::TEXT_INSET;
use crate::options::PrintableOptions;
use crate::types::*;

use super::frame::PageFrame;
use super::margin::{MarginLedger, expand_page};
use super::metrics::{text_extent, wrap_text};
use super::order::order_annotations;
use super::route::{detect_column, place_note, route_connector, select_anchor};
use super::types::{NotePlacement, PagePlan, SourceAnnotation, Word};

/// Lay out the margin notes of one page.
///
/// The page is expanded, its annotations ordered, and every annotation gets
/// a note box below the notes placed before it plus a routed connector.
/// Nothing is written to the document here.
pub fn plan_page(
    page_number: u32,
    frame: PageFrame,
    words: &[Word],
    mut annotations: Vec<SourceAnnotation>,
    options: &PrintableOptions,
) -> Result<PagePlan> {
    let expansion = expand_page(frame, words, options.expand_ratio);
    let mut plan = PagePlan {
        page_number,
        frame: expansion.expanded,
        margin: expansion.margin,
        notes: Vec::new(),
    };

    if annotations.is_empty() {
        return Ok(plan);
    }

    let margin = expansion
        .margin
        .ok_or(PrintableError::NoText { page: page_number })?;

    if let Some(annotation) = annotations.iter().find(|a| a.vertices.is_empty()) {
        return Err(PrintableError::MissingGeometry {
            page: page_number,
            index: annotation.index,
        });
    }

    order_annotations(&mut annotations);

    let page_right = expansion.expanded.width();
    let mut ledger = MarginLedger::new();

    for annotation in annotations {
        let anchor = select_anchor(&annotation.vertices, page_right).ok_or(
            PrintableError::MissingGeometry {
                page: page_number,
                index: annotation.index,
            },
        )?;
        let column = detect_column(words, anchor);

        let note_rect = place_note(&margin, &ledger, options.note_padding)
            .ok_or(PrintableError::MarginExhausted { page: page_number })?;

        let lines = wrap_text(
            &annotation.content,
            options.font_size,
            note_rect.width - 2.0 * TEXT_INSET,
        );
        let extent = text_extent(&note_rect, lines.len(), options.font_size);
        ledger.record(extent);

        let segments = route_connector(
            anchor,
            column.as_ref(),
            &margin,
            &note_rect,
            options.stub_length,
        );

        log::debug!(
            "page {}: annotation {} anchored at ({:.1}, {:.1}), note at ({:.1}, {:.1}), {} segments",
            page_number,
            annotation.index,
            anchor.x,
            anchor.y,
            note_rect.x,
            note_rect.y,
            segments.len()
        );

        plan.notes.push(NotePlacement {
            source_index: annotation.index,
            subtype: annotation.subtype,
            anchor,
            note_rect,
            text_extent: extent,
            lines,
            content: annotation.content,
            color: annotation.color,
            column_x: column.map(|column| column.x),
            segments,
        });
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Point;

    fn body_word(left: f32, top: f32, right: f32) -> Word {
        Word {
            left,
            top,
            right,
            bottom: top + 12.0,
            text: "body".to_string(),
        }
    }

    fn note(index: usize, x: f32, y: f32, content: &str) -> SourceAnnotation {
        SourceAnnotation {
            index,
            subtype: "Text".to_string(),
            vertices: vec![Point::new(x, y)],
            content: content.to_string(),
            color: Color::new(1.0, 0.0, 0.0),
        }
    }

    #[test]
    fn test_single_note_without_column() {
        let frame = PageFrame::new(0.0, 0.0, 600.0, 800.0);
        let words = vec![body_word(60.0, 90.0, 300.0)];
        let plan = plan_page(
            1,
            frame,
            &words,
            vec![note(0, 590.0, 10.0, "Hello")],
            &PrintableOptions::default(),
        )
        .unwrap();

        assert_eq!(plan.frame.width(), 780.0);
        assert_eq!(plan.notes.len(), 1);
        let placed = &plan.notes[0];
        assert_eq!(placed.note_rect.x, 324.0);
        assert_eq!(placed.anchor, Point::new(590.0, 10.0));
        assert_eq!(placed.segments.len(), 2);
        assert_eq!(placed.column_x, None);
        assert_eq!(placed.lines, vec!["Hello"]);
    }

    #[test]
    fn test_notes_stack_in_distance_order() {
        let frame = PageFrame::new(0.0, 0.0, 600.0, 800.0);
        let words = vec![body_word(60.0, 90.0, 300.0)];
        let plan = plan_page(
            1,
            frame,
            &words,
            vec![note(0, 200.0, 400.0, "second"), note(1, 100.0, 50.0, "first")],
            &PrintableOptions::default(),
        )
        .unwrap();

        assert_eq!(plan.notes[0].source_index, 1);
        assert_eq!(plan.notes[1].source_index, 0);
        let first = &plan.notes[0];
        let second = &plan.notes[1];
        assert_eq!(second.note_rect.y, first.text_extent.bottom() + 24.0);
        assert!(second.note_rect.right() <= plan.frame.width());
        assert!(second.note_rect.bottom() <= plan.frame.height());
    }

    #[test]
    fn test_page_without_annotations_is_only_expanded() {
        let frame = PageFrame::new(0.0, 0.0, 600.0, 800.0);
        let plan = plan_page(3, frame, &[], Vec::new(), &PrintableOptions::default()).unwrap();
        assert_eq!(plan.frame.width(), 780.0);
        assert!(plan.notes.is_empty());
        assert!(plan.margin.is_none());
    }

    #[test]
    fn test_annotations_without_text_fail() {
        let frame = PageFrame::new(0.0, 0.0, 600.0, 800.0);
        let result = plan_page(
            2,
            frame,
            &[],
            vec![note(0, 100.0, 100.0, "x")],
            &PrintableOptions::default(),
        );
        assert!(matches!(result, Err(PrintableError::NoText { page: 2 })));
    }

    #[test]
    fn test_annotation_without_vertices_fails() {
        let frame = PageFrame::new(0.0, 0.0, 600.0, 800.0);
        let words = vec![body_word(60.0, 90.0, 300.0)];
        let mut empty = note(4, 0.0, 0.0, "x");
        empty.vertices.clear();
        let result = plan_page(1, frame, &words, vec![empty], &PrintableOptions::default());
        assert!(matches!(
            result,
            Err(PrintableError::MissingGeometry { page: 1, index: 4 })
        ));
    }

    #[test]
    fn test_margin_exhaustion_is_reported() {
        let frame = PageFrame::new(0.0, 0.0, 600.0, 80.0);
        let words = vec![body_word(60.0, 10.0, 300.0)];
        let result = plan_page(
            1,
            frame,
            &words,
            vec![note(0, 100.0, 10.0, "one"), note(1, 100.0, 20.0, "two")],
            &PrintableOptions::default(),
        );
        assert!(matches!(
            result,
            Err(PrintableError::MarginExhausted { page: 1 })
        ));
    }
}
