use crate::shared::rect::Rect;

/// Picks the candidate with the strictly largest area.
///
/// Comparison is strict-greater, so on an exact area tie the first
/// candidate in iteration order wins. Zero-area candidates can never win;
/// if every candidate has zero area the result is `None`, the same as an
/// empty slice.
pub fn largest(candidates: &[Rect]) -> Option<Rect> {
    let mut best: Option<Rect> = None;
    let mut best_area: i64 = 0;
    for candidate in candidates {
        if candidate.area() > best_area {
            best_area = candidate.area();
            best = Some(*candidate);
        }
    }
    best
}
