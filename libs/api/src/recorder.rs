use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contiguous interval of recorded footage reported by the timeline endpoint.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordingSegment {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl RecordingSegment {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn key(&self) -> SegmentKey {
        SegmentKey {
            start: self.start,
            end: self.end,
        }
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

/// Identity of a segment within a timeline: its exact start/end pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentKey {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Timeline {
    #[serde(default)]
    pub segments: Vec<RecordingSegment>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TimelineResponse {
    pub timeline: Timeline,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RecordingStream {
    pub url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RecordingStreamResponse {
    pub stream: RecordingStream,
}
