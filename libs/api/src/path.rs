use serde_html_form::ser::Error;

use crate::recorder::RecordingSegment;
use crate::request::TimelineQuery;

pub const LOGIN: &str = "/login/";
pub const CAMERAS: &str = "/cameras/";

pub fn stream(camera_id: u64) -> String {
    format!("/stream/{}/", camera_id)
}

pub fn recording_timeline(camera_id: u64, qry: &TimelineQuery) -> Result<String, Error> {
    let query = serde_html_form::to_string(qry)?;
    Ok(format!("/recording-timeline/{}/?{}", camera_id, query))
}

pub fn recording_stream(camera_id: u64, segment: &RecordingSegment) -> Result<String, Error> {
    let query = serde_html_form::to_string(segment)?;
    Ok(format!("/recording-stream/{}/?{}", camera_id, query))
}
