use api::recorder::{RecordingSegment, SegmentKey};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Orders a fetched timeline by `(start, end)` and drops exact duplicates.
///
/// Overlapping segments are kept. Segment identity is the start/end pair, so a duplicate
/// could never be told apart from its twin.
pub fn normalize(mut segments: Vec<RecordingSegment>) -> Vec<RecordingSegment> {
    if !segments.windows(2).all(|w| w[0].key() <= w[1].key()) {
        debug!("timeline is out of order, sorting {} segments", segments.len());
        segments.sort_by_key(RecordingSegment::key);
    }
    let count = segments.len();
    segments.dedup_by_key(|segment| segment.key());
    if segments.len() != count {
        debug!("dropped {} duplicate segments", count - segments.len());
    }
    segments
}

/// Position of the segment with exactly this key in a normalized timeline.
pub fn position(segments: &[RecordingSegment], key: &SegmentKey) -> Option<usize> {
    segments
        .binary_search_by(|segment| segment.key().cmp(key))
        .ok()
}

pub fn neighbour(
    segments: &[RecordingSegment],
    index: usize,
    direction: Direction,
) -> Option<&RecordingSegment> {
    match direction {
        Direction::Previous => index.checked_sub(1).and_then(|i| segments.get(i)),
        Direction::Next => index.checked_add(1).and_then(|i| segments.get(i)),
    }
}
