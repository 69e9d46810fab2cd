//! Turning annotations into printable margin notes
//!
//! The conversion runs in two phases:
//! 1. Plan every page (read-only): frames, words, annotations, layout
//! 2. Apply the plans: expand page boxes, then add notes and connectors
//!
//! Every error is raised during planning, so a failed conversion leaves the
//! document untouched.

mod io;

pub use io::{load_pdf, printable_path, save_pdf};

use crate::constants::NOTE_NAME_PREFIX;
use crate::extract::{extract_words, has_annotations, next_run, page_frame, read_source_annotations};
use crate::layout::{PagePlan, plan_page};
use crate::options::PrintableOptions;
use crate::render::{
    NoteResources, append_annotation, free_text_annotation, line_annotation, set_page_boxes,
};
use crate::types::*;
use lopdf::{Document, ObjectId};
use std::path::PathBuf;

/// Convert a document in place of its annotations.
///
/// Returns the modified document; `doc` itself is not changed.
pub async fn make_printable(doc: &Document, options: &PrintableOptions) -> Result<Document> {
    options.validate_layout()?;

    let mut doc = doc.clone();
    let options = options.clone();

    tokio::task::spawn_blocking(move || {
        let plans = plan_document(&doc, &options)?;
        apply_plans_sync(&mut doc, &plans, &options)?;
        Ok(doc)
    })
    .await?
}

/// Apply plans made by [`plan_document`] for the same document.
///
/// Lets callers inspect the plans (for statistics) without planning twice.
/// Returns the modified document; `doc` itself is not changed.
pub async fn apply_plans(
    doc: &Document,
    plans: &[(ObjectId, PagePlan)],
    options: &PrintableOptions,
) -> Result<Document> {
    options.validate_layout()?;

    let mut doc = doc.clone();
    let plans = plans.to_vec();
    let options = options.clone();

    tokio::task::spawn_blocking(move || {
        apply_plans_sync(&mut doc, &plans, &options)?;
        Ok(doc)
    })
    .await?
}

/// Convert `options.input_file` and write the result.
///
/// Returns the path written to.
pub async fn convert_file(options: &PrintableOptions) -> Result<PathBuf> {
    options.validate()?;

    let output = options.output_path();
    log::info!("Loading {}", options.input_file.display());
    let doc = load_pdf(&options.input_file).await?;

    let converted = make_printable(&doc, options).await?;

    log::info!("Saving {}", output.display());
    save_pdf(converted, &output).await?;
    Ok(output)
}

fn apply_plans_sync(
    doc: &mut Document,
    plans: &[(ObjectId, PagePlan)],
    options: &PrintableOptions,
) -> Result<()> {
    let run = next_run(doc);
    let resources = NoteResources::new(doc);
    let mut notes = 0;
    let mut lines = 0;

    for (page_id, plan) in plans {
        set_page_boxes(doc, *page_id, &plan.frame)?;
        let (page_notes, page_lines) =
            apply_plan(doc, *page_id, plan, options, &resources, run)?;
        notes += page_notes;
        lines += page_lines;
    }

    log::info!(
        "Added {} notes and {} connector lines across {} pages (run {})",
        notes,
        lines,
        plans.len(),
        run
    );
    Ok(())
}

/// Plan every page of the document without modifying it.
///
/// Fails with [`PrintableError::NoAnnotations`] when no page carries a
/// source annotation, which includes documents without pages.
pub fn plan_document(doc: &Document, options: &PrintableOptions) -> Result<Vec<(ObjectId, PagePlan)>> {
    if !has_annotations(doc) {
        return Err(PrintableError::NoAnnotations);
    }

    let pages = doc.get_pages();
    let mut plans = Vec::with_capacity(pages.len());
    for (&page_number, &page_id) in &pages {
        let frame = page_frame(doc, page_id)?;
        let annotations = read_source_annotations(doc, page_id, &frame)?;

        // Word boxes are only needed to size the margin of annotated pages
        let words = if annotations.is_empty() {
            Vec::new()
        } else {
            extract_words(doc, page_id, &frame)?
        };

        let plan = plan_page(page_number, frame, &words, annotations, options)?;
        plans.push((page_id, plan));
    }

    Ok(plans)
}

/// Write one page's notes and connectors; returns (notes, lines) added
fn apply_plan(
    doc: &mut Document,
    page_id: ObjectId,
    plan: &PagePlan,
    options: &PrintableOptions,
    resources: &NoteResources,
    run: u32,
) -> Result<(usize, usize)> {
    let mut lines = 0;

    for (number, note) in plan.notes.iter().enumerate() {
        let name = format!(
            "{}-r{}-p{}-{}",
            NOTE_NAME_PREFIX,
            run,
            plan.page_number,
            number + 1
        );

        let note_id = free_text_annotation(
            doc,
            page_id,
            &plan.frame,
            note,
            options.font_size,
            resources,
            &name,
        )?;
        append_annotation(doc, page_id, note_id)?;

        for (k, segment) in note.segments.iter().enumerate() {
            let line_id = line_annotation(
                doc,
                page_id,
                &plan.frame,
                segment,
                note.color,
                options.line_width,
                &format!("{}-line{}", name, k + 1),
            )?;
            append_annotation(doc, page_id, line_id)?;
            lines += 1;
        }
    }

    Ok((plan.notes.len(), lines))
}
