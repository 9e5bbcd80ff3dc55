use serde::{Deserialize, Serialize};

/// Container format of a live stream representation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StreamFormat {
    Mp4,
    Mjpeg,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for StreamFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamFormat::Mp4 => write!(f, "mp4"),
            StreamFormat::Mjpeg => write!(f, "mjpeg"),
            StreamFormat::Other => write!(f, "other"),
        }
    }
}

/// One playable representation of a camera's live feed
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StreamDescriptor {
    pub format: StreamFormat,
    pub url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StreamDetailsResponse {
    #[serde(default)]
    pub stream_details: Vec<StreamDescriptor>,
}
