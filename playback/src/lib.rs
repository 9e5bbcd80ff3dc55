pub mod controller;
pub mod error;
pub mod live;
pub mod seek;
pub mod source;
pub mod surface;
pub mod timeline;

mod generation;


pub use controller::{ActiveSegmentPlayback, Outcome, PlaybackController, PlaybackSnapshot};
pub use error::PlaybackError;
pub use live::LiveStream;
pub use source::CameraApi;
pub use surface::{MediaHandle, MediaSurface};
pub use timeline::Direction;
