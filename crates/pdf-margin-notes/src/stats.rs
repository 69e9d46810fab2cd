use crate::layout::PagePlan;
use crate::options::PrintableOptions;
use crate::printable::plan_document;
use crate::types::*;
use lopdf::{Document, ObjectId};

/// Characters of annotation text shown in a summary
const PREVIEW_CHARS: usize = 40;

/// Calculate statistics for a conversion without modifying the document
pub fn calculate_statistics(
    doc: &Document,
    options: &PrintableOptions,
) -> Result<PrintableStatistics> {
    options.validate_layout()?;
    let plans = plan_document(doc, options)?;
    Ok(summarize_plans(&plans))
}

/// Statistics for plans made by [`plan_document`]
pub fn summarize_plans(plans: &[(ObjectId, PagePlan)]) -> PrintableStatistics {
    let mut stats = PrintableStatistics {
        pages: plans.len(),
        annotated_pages: 0,
        source_annotations: 0,
        notes_added: 0,
        lines_added: 0,
        per_page: Vec::new(),
    };

    for (_, plan) in plans {
        if plan.notes.is_empty() {
            continue;
        }

        let annotations: Vec<AnnotationSummary> = plan
            .notes
            .iter()
            .map(|note| AnnotationSummary {
                index: note.source_index,
                subtype: note.subtype.clone(),
                preview: preview(&note.content),
                anchor: (note.anchor.x, note.anchor.y),
            })
            .collect();

        let page = PageStatistics {
            page_number: plan.page_number,
            notes_added: annotations.len(),
            annotations,
            lines_added: plan.notes.iter().map(|note| note.segments.len()).sum(),
            column_detours: plan
                .notes
                .iter()
                .filter(|note| note.column_x.is_some())
                .count(),
        };

        stats.annotated_pages += 1;
        stats.source_annotations += page.annotations.len();
        stats.notes_added += page.notes_added;
        stats.lines_added += page.lines_added;
        stats.per_page.push(page);
    }

    stats
}

fn preview(content: &str) -> String {
    let flat: String = content
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let mut short: String = flat.chars().take(PREVIEW_CHARS).collect();
    short.push_str("...");
    short
}
