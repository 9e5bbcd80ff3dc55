use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Login {
    pub token: String,
}

/// Date range used to filter the recording timeline.
///
/// The range is taken as given: a reversed range is sent to the server unchanged.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimelineQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimelineQuery {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn window(start: DateTime<Utc>, hours: u32) -> Self {
        Self {
            start,
            end: start + Duration::hours(hours as i64),
        }
    }
}

impl Default for TimelineQuery {
    fn default() -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 8, 8, 9, 0, 0)
            .single()
            .unwrap_or_default();
        Self::window(start, 24)
    }
}
