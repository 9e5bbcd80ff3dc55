use api::stream::{StreamDescriptor, StreamFormat};

/// Formats accepted for live view, most preferred first.
const PREFERRED_FORMATS: [StreamFormat; 2] = [StreamFormat::Mp4, StreamFormat::Mjpeg];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveStream {
    Pending,
    Available(StreamDescriptor),
    /// The camera has no mp4 or mjpeg representation. Not an error.
    Unavailable,
    Failed(String),
}

impl LiveStream {
    pub fn resolve(streams: &[StreamDescriptor]) -> Self {
        match select_live_stream(streams) {
            Some(stream) => LiveStream::Available(stream.clone()),
            None => LiveStream::Unavailable,
        }
    }

    pub fn descriptor(&self) -> Option<&StreamDescriptor> {
        match self {
            LiveStream::Available(stream) => Some(stream),
            _ => None,
        }
    }
}

pub fn select_live_stream(streams: &[StreamDescriptor]) -> Option<&StreamDescriptor> {
    PREFERRED_FORMATS
        .iter()
        .find_map(|format| streams.iter().find(|stream| stream.format == *format))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(format: StreamFormat, url: &str) -> StreamDescriptor {
        StreamDescriptor {
            format,
            url: url.to_string(),
        }
    }

    #[test]
    fn test_mp4_preferred_regardless_of_position() {
        let streams = vec![
            stream(StreamFormat::Mjpeg, "m1"),
            stream(StreamFormat::Other, "o1"),
            stream(StreamFormat::Mjpeg, "m2"),
            stream(StreamFormat::Mp4, "p1"),
        ];
        assert_eq!(
            LiveStream::resolve(&streams),
            LiveStream::Available(stream(StreamFormat::Mp4, "p1"))
        );
    }

    #[test]
    fn test_first_mp4_wins() {
        let streams = vec![stream(StreamFormat::Mp4, "p1"), stream(StreamFormat::Mp4, "p2")];
        assert_eq!(select_live_stream(&streams).unwrap().url, "p1");
    }

    #[test]
    fn test_mjpeg_fallback() {
        let streams = vec![stream(StreamFormat::Other, "o1"), stream(StreamFormat::Mjpeg, "m1")];
        assert_eq!(
            LiveStream::resolve(&streams),
            LiveStream::Available(stream(StreamFormat::Mjpeg, "m1"))
        );
    }

    #[test]
    fn test_no_live_stream() {
        assert_eq!(LiveStream::resolve(&[]), LiveStream::Unavailable);
        assert_eq!(
            LiveStream::resolve(&[stream(StreamFormat::Other, "o1")]),
            LiveStream::Unavailable
        );
        assert!(LiveStream::Unavailable.descriptor().is_none());
    }
}
