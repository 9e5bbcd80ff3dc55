use serde::{Deserialize, Serialize};

use crate::stream::StreamDescriptor;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<UserData>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Account summary returned on login and cached in the session store.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UserData {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub my_cameras_count: u32,
    #[serde(default)]
    pub shared_cameras_count: u32,
    #[serde(default)]
    pub total_cameras_count: u32,
    #[serde(default)]
    pub cameras_with_guests_count: u32,
    #[serde(default)]
    pub root_site: Option<String>,
    #[serde(default)]
    pub require_qualification: bool,
    #[serde(default)]
    pub available_features: serde_json::Value,
}

impl UserData {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Snapshot {
    pub url: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Owner {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Application {
    pub code: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Camera {
    pub id: u64,
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub snapshot: Option<Snapshot>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub live_snapshot: Option<String>,
    #[serde(default)]
    pub streams: Vec<StreamDescriptor>,
    #[serde(default)]
    pub applications: Vec<Application>,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub has_recording: bool,
    #[serde(default)]
    pub has_notifications: bool,
    #[serde(default)]
    pub audio_enabled: bool,
    #[serde(default)]
    pub low_latency_enabled: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct CameraPage {
    #[serde(default)]
    pub results: Vec<Camera>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CameraListResponse {
    pub cameras: CameraPage,
}
