use std::time::Duration;

use anyhow::Result;

/// A media pipeline bound to one stream url.
///
/// The pipeline is released when the handle is dropped; there is no separate close call.
pub trait MediaHandle: Send {
    fn url(&self) -> &str;

    /// Moves the playback position to `position` from the start of the stream.
    fn seek(&mut self, position: Duration) -> Result<()>;
}

/// The single playback surface a controller drives.
pub trait MediaSurface: Send {
    type Handle: MediaHandle;

    /// Callers must drop any previous handle before attaching a new one.
    fn attach(&mut self, url: &str) -> Result<Self::Handle>;
}
