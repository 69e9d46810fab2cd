use super::types::SourceAnnotation;

/// Sort annotations by their closest vertex to the page's top-left corner.
///
/// The sort is stable: annotations at the same distance keep their
/// document order.
pub fn order_annotations(annotations: &mut [SourceAnnotation]) {
    annotations.sort_by(|a, b| a.origin_distance().total_cmp(&b.origin_distance()));
}
