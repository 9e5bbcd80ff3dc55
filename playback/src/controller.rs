use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use api::recorder::RecordingSegment;
use api::request::TimelineQuery;

use crate::error::PlaybackError;
use crate::generation::Generation;
use crate::live::LiveStream;
use crate::seek::parse_time_of_day;
use crate::source::CameraApi;
use crate::surface::{MediaHandle, MediaSurface};
use crate::timeline::{self, Direction};

type Result<T> = std::result::Result<T, PlaybackError>;

/// What happened to a request once it completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// A newer request of the same kind was issued meanwhile; the result was discarded.
    Superseded,
    /// The operation is not available in the current state; nothing changed.
    Disabled,
    /// The input could not be parsed; nothing changed.
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActiveSegmentPlayback {
    /// `None` when no segment is attached, or when the attached segment has no exact match in
    /// the current timeline.
    pub segment_index: Option<usize>,
    pub stream_url: Option<String>,
    /// `None` while nothing or the live stream is attached.
    pub segment: Option<RecordingSegment>,
}

impl ActiveSegmentPlayback {
    pub fn is_attached(&self) -> bool {
        self.stream_url.is_some()
    }

    pub fn is_live(&self) -> bool {
        self.is_attached() && self.segment.is_none()
    }
}

/// Point-in-time copy of the controller state for rendering.
#[derive(Debug, Clone)]
pub struct PlaybackSnapshot {
    pub camera_id: Option<u64>,
    pub live: LiveStream,
    pub live_loading: bool,
    pub query: TimelineQuery,
    pub segments: Vec<RecordingSegment>,
    pub timeline_loading: bool,
    pub timeline_error: Option<String>,
    pub active: ActiveSegmentPlayback,
    pub segment_loading: bool,
    pub segment_error: Option<String>,
}

impl PlaybackSnapshot {
    pub fn can_previous(&self) -> bool {
        matches!(self.active.segment_index, Some(i) if i > 0)
    }

    pub fn can_next(&self) -> bool {
        matches!(self.active.segment_index, Some(i) if i + 1 < self.segments.len())
    }

    /// Any attached recording can seek; the live stream cannot.
    pub fn can_seek(&self) -> bool {
        self.active.segment.is_some()
    }
}

#[derive(Debug, Clone)]
struct Mount {
    camera_id: u64,
    credential: String,
}

struct Active<H> {
    handle: H,
    segment: Option<RecordingSegment>,
    index: Option<usize>,
}

struct State<M: MediaSurface> {
    mount: Option<Mount>,
    surface: M,

    live: LiveStream,
    live_loading: bool,
    live_generation: Generation,

    query: TimelineQuery,
    segments: Vec<RecordingSegment>,
    timeline_loading: bool,
    timeline_error: Option<String>,
    timeline_generation: Generation,

    active: Option<Active<M::Handle>>,
    segment_loading: bool,
    segment_error: Option<String>,
    segment_generation: Generation,
}

impl<M: MediaSurface> State<M> {
    fn mount(&self) -> Result<Mount> {
        self.mount.clone().ok_or(PlaybackError::NotInitialized)
    }

    fn is_recording_attached(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.segment.is_some())
    }

    /// Drops the attached handle, which releases its pipeline.
    fn release(&mut self, reason: &str) -> bool {
        match self.active.take() {
            Some(active) => {
                info!("release media pipeline {} ({})", active.handle.url(), reason);
                drop(active);
                true
            }
            None => false,
        }
    }
}

/// Live view and recording playback for one camera.
///
/// Every method takes `&self`; requests of different kinds run independently and update only
/// their own slice of state. Within one kind the most recently issued request wins: results of
/// older requests that complete later are discarded.
pub struct PlaybackController<A, M: MediaSurface> {
    api: A,
    default_query: TimelineQuery,
    state: Mutex<State<M>>,
}

impl<A: CameraApi, M: MediaSurface> PlaybackController<A, M> {
    pub fn new(api: A, surface: M, default_query: TimelineQuery) -> Self {
        Self {
            api,
            default_query,
            state: Mutex::new(State {
                mount: None,
                surface,
                live: LiveStream::Pending,
                live_loading: false,
                live_generation: Generation::default(),
                query: default_query,
                segments: Vec::new(),
                timeline_loading: false,
                timeline_error: None,
                timeline_generation: Generation::default(),
                active: None,
                segment_loading: false,
                segment_error: None,
                segment_generation: Generation::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<M>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens `camera_id` and fetches the live stream and the default timeline concurrently.
    ///
    /// Fetch failures land in the live and timeline error slices and do not fail the call.
    pub async fn initialize(&self, camera_id: u64, credential: &str) -> Result<()> {
        if camera_id == 0 {
            return Err(PlaybackError::InvalidCamera(camera_id));
        }
        if credential.trim().is_empty() {
            return Err(PlaybackError::EmptyCredential);
        }

        {
            let mut state = self.lock();
            state.release("camera changed");
            state.mount = Some(Mount {
                camera_id,
                credential: credential.to_owned(),
            });
            state.live = LiveStream::Pending;
            state.segments.clear();
            state.query = self.default_query;
            state.timeline_error = None;
            state.segment_error = None;
            state.segment_loading = false;
            // lookups issued for the previous camera must not attach
            state.segment_generation.issue();
        }
        info!("open camera {}", camera_id);

        let query = self.default_query;
        let (live, timeline) = tokio::join!(
            self.refresh_live_stream(),
            self.set_timeline_filter(query.start, query.end)
        );
        if let Err(e) = live {
            warn!("camera {} live stream: {}", camera_id, e);
        }
        if let Err(e) = timeline {
            warn!("camera {} recording timeline: {}", camera_id, e);
        }
        Ok(())
    }

    /// Re-fetches the stream details and resolves the live stream: mp4, else mjpeg.
    pub async fn refresh_live_stream(&self) -> Result<Outcome> {
        let (ticket, mount) = {
            let mut state = self.lock();
            let mount = state.mount()?;
            state.live_loading = true;
            (state.live_generation.issue(), mount)
        };

        let result = self
            .api
            .stream_details(&mount.credential, mount.camera_id)
            .await;

        let mut state = self.lock();
        if !state.live_generation.is_current(ticket) {
            debug!("discard superseded stream details for camera {}", mount.camera_id);
            return Ok(Outcome::Superseded);
        }
        state.live_loading = false;
        match result {
            Ok(streams) => {
                state.live = LiveStream::resolve(&streams);
                match state.live.descriptor() {
                    Some(stream) => info!("live stream {} {}", stream.format, stream.url),
                    None => info!("camera {} has no live stream", mount.camera_id),
                }
                Ok(Outcome::Applied)
            }
            Err(e) => {
                let message = format!("{:#}", e);
                state.live = LiveStream::Failed(message.clone());
                Err(PlaybackError::Request(message))
            }
        }
    }

    /// Replaces the timeline with the segments recorded between `start` and `end`.
    ///
    /// Once the new timeline is applied any attached segment is released: positions in the
    /// old timeline mean nothing in the new one.
    pub async fn set_timeline_filter(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Outcome> {
        let query = TimelineQuery::new(start, end);
        let (ticket, mount) = {
            let mut state = self.lock();
            let mount = state.mount()?;
            state.timeline_loading = true;
            (state.timeline_generation.issue(), mount)
        };

        let result = self
            .api
            .recording_timeline(&mount.credential, mount.camera_id, &query)
            .await;

        let mut state = self.lock();
        if !state.timeline_generation.is_current(ticket) {
            debug!("discard superseded timeline {} .. {}", start, end);
            return Ok(Outcome::Superseded);
        }
        state.timeline_loading = false;
        match result {
            Ok(segments) => {
                state.segments = timeline::normalize(segments);
                state.query = query;
                state.timeline_error = None;
                if state.is_recording_attached() {
                    state.release("timeline filter changed");
                }
                info!(
                    "timeline {} .. {}: {} segments",
                    start,
                    end,
                    state.segments.len()
                );
                Ok(Outcome::Applied)
            }
            Err(e) => {
                let message = format!("{:#}", e);
                state.timeline_error = Some(message.clone());
                Err(PlaybackError::Request(message))
            }
        }
    }

    /// Resolves the stream url of `segment` and attaches it to the surface.
    ///
    /// The previous pipeline is released before the new one is attached. If the lookup fails
    /// the current playback is left as it was.
    pub async fn select_segment(&self, segment: RecordingSegment) -> Result<Outcome> {
        let (ticket, mount) = {
            let mut state = self.lock();
            let mount = state.mount()?;
            state.segment_loading = true;
            (state.segment_generation.issue(), mount)
        };

        let result = self
            .api
            .recording_stream(&mount.credential, mount.camera_id, &segment)
            .await;

        let mut guard = self.lock();
        let state = &mut *guard;
        if !state.segment_generation.is_current(ticket) {
            debug!("discard superseded lookup for {} .. {}", segment.start, segment.end);
            return Ok(Outcome::Superseded);
        }
        state.segment_loading = false;

        let url = match result {
            Ok(url) => url,
            Err(e) => {
                let message = format!("{:#}", e);
                state.segment_error = Some(message.clone());
                return Err(PlaybackError::Request(message));
            }
        };

        state.release("segment replaced");
        let handle = match state.surface.attach(&url) {
            Ok(handle) => handle,
            Err(e) => {
                let message = format!("{:#}", e);
                state.segment_error = Some(message.clone());
                return Err(PlaybackError::Attach(message));
            }
        };

        let index = timeline::position(&state.segments, &segment.key());
        match index {
            Some(i) => info!("attach segment {}/{} {}", i + 1, state.segments.len(), url),
            None => warn!(
                "segment {} .. {} is not in the current timeline, navigation disabled",
                segment.start, segment.end
            ),
        }
        state.segment_error = None;
        state.active = Some(Active {
            handle,
            segment: Some(segment),
            index,
        });
        Ok(Outcome::Applied)
    }

    /// Attaches the resolved live stream, replacing whatever is playing.
    ///
    /// A segment lookup still in flight is superseded. Selecting a segment afterwards replaces
    /// the live view in turn.
    pub fn watch_live(&self) -> Result<Outcome> {
        let mut guard = self.lock();
        let state = &mut *guard;
        state.mount()?;
        let Some(url) = state.live.descriptor().map(|stream| stream.url.clone()) else {
            debug!("no live stream to watch");
            return Ok(Outcome::Disabled);
        };

        state.segment_generation.issue();
        state.segment_loading = false;
        state.release("live view");
        let handle = match state.surface.attach(&url) {
            Ok(handle) => handle,
            Err(e) => {
                let message = format!("{:#}", e);
                state.segment_error = Some(message.clone());
                return Err(PlaybackError::Attach(message));
            }
        };
        info!("attach live stream {}", url);
        state.segment_error = None;
        state.active = Some(Active {
            handle,
            segment: None,
            index: None,
        });
        Ok(Outcome::Applied)
    }

    /// Selects the segment before or after the attached one.
    pub async fn select_adjacent_segment(&self, direction: Direction) -> Result<Outcome> {
        let target = {
            let state = self.lock();
            state
                .active
                .as_ref()
                .and_then(|active| active.index)
                .and_then(|index| timeline::neighbour(&state.segments, index, direction))
                .copied()
        };

        match target {
            Some(segment) => self.select_segment(segment).await,
            None => {
                debug!("{:?} segment is not available", direction);
                Ok(Outcome::Disabled)
            }
        }
    }

    /// Seeks the attached pipeline to `time_of_day` (`hh:mm:ss`) from the segment start.
    pub fn seek_absolute(&self, time_of_day: &str) -> Result<Outcome> {
        let Some(offset) = parse_time_of_day(time_of_day) else {
            warn!("ignore malformed seek time {:?}", time_of_day);
            return Ok(Outcome::Rejected);
        };

        let mut state = self.lock();
        let recording = state
            .active
            .as_mut()
            .filter(|active| active.segment.is_some());
        let Some(active) = recording else {
            debug!("seek without an attached recording");
            return Ok(Outcome::Disabled);
        };
        active
            .handle
            .seek(Duration::from_secs(offset))
            .map_err(|e| PlaybackError::Seek(format!("{:#}", e)))?;
        debug!("seek {} to {}s", active.handle.url(), offset);
        Ok(Outcome::Applied)
    }

    /// Releases the media pipeline. Returns whether one was attached.
    ///
    /// In-flight requests are not cancelled.
    pub fn teardown(&self) -> bool {
        self.lock().release("teardown")
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        let state = self.lock();
        let active = match &state.active {
            Some(active) => ActiveSegmentPlayback {
                segment_index: active.index,
                stream_url: Some(active.handle.url().to_owned()),
                segment: active.segment,
            },
            None => ActiveSegmentPlayback::default(),
        };
        PlaybackSnapshot {
            camera_id: state.mount.as_ref().map(|mount| mount.camera_id),
            live: state.live.clone(),
            live_loading: state.live_loading,
            query: state.query,
            segments: state.segments.clone(),
            timeline_loading: state.timeline_loading,
            timeline_error: state.timeline_error.clone(),
            active,
            segment_loading: state.segment_loading,
            segment_error: state.segment_error.clone(),
        }
    }
}

impl<A, M: MediaSurface> Drop for PlaybackController<A, M> {
    fn drop(&mut self) {
        let state = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(active) = state.active.take() {
            debug!("controller dropped, release {}", active.handle.url());
        }
    }
}
