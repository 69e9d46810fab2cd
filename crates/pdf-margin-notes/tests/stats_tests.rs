mod common;

use common::*;
use pdf_margin_notes::*;

#[test]
fn test_statistics_for_mixed_document() {
    let doc = create_test_pdf(vec![
        scenario_page(),
        TestPage::new(600.0, 800.0).text(60.0, 700.0, "plain"),
        two_column_page(),
    ]);
    let stats = calculate_statistics(&doc, &PrintableOptions::default()).unwrap();

    assert_eq!(stats.pages, 3);
    assert_eq!(stats.annotated_pages, 2);
    assert_eq!(stats.source_annotations, 2);
    assert_eq!(stats.notes_added, 2);
    assert_eq!(stats.lines_added, 6);

    let first = &stats.per_page[0];
    assert_eq!(first.page_number, 1);
    assert_eq!(first.lines_added, 2);
    assert_eq!(first.column_detours, 0);
    assert_eq!(first.annotations[0].subtype, "Text");
    assert_eq!(first.annotations[0].preview, "Hello");
    assert_eq!(first.annotations[0].anchor, (590.0, 10.0));

    let second = &stats.per_page[1];
    assert_eq!(second.page_number, 3);
    assert_eq!(second.lines_added, 4);
    assert_eq!(second.column_detours, 1);
}

#[test]
fn test_statistics_without_annotations() {
    let doc = create_test_pdf(vec![TestPage::new(600.0, 800.0).text(60.0, 700.0, "plain")]);
    let result = calculate_statistics(&doc, &PrintableOptions::default());
    assert!(matches!(result, Err(PrintableError::NoAnnotations)));
}

#[test]
fn test_statistics_do_not_modify_document() {
    let doc = create_test_pdf(vec![scenario_page()]);
    let before = doc.objects.len();
    calculate_statistics(&doc, &PrintableOptions::default()).unwrap();
    assert_eq!(doc.objects.len(), before);
}
