#![allow(dead_code)]

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use playback::{MediaHandle, MediaSurface};

pub const TOKEN: &str = "pat-0123456789";
pub const CAMERA: u64 = 42;
pub const MISSING_CAMERA: u64 = 404;

#[derive(Deserialize)]
struct LoginForm {
    token: String,
}

#[derive(Deserialize)]
struct Range {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

fn authorized(headers: &HeaderMap) -> Result<(), StatusCode> {
    let expected = format!("Bearer {}", TOKEN);
    match headers.get("Authorization").map(|value| value.to_str()) {
        Some(Ok(value)) if value == expected => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

pub fn recorded_segments() -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    vec![
        (
            Utc.with_ymd_and_hms(2024, 8, 8, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 8, 8, 10, 5, 0).unwrap(),
        ),
        (
            Utc.with_ymd_and_hms(2024, 8, 8, 11, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 8, 8, 11, 10, 0).unwrap(),
        ),
    ]
}

pub fn segment_url(camera_id: u64, start: DateTime<Utc>) -> String {
    format!(
        "https://cdn.example.com/{}/{}/index.m3u8",
        camera_id,
        start.timestamp()
    )
}

async fn login(headers: HeaderMap, Form(form): Form<LoginForm>) -> (StatusCode, Json<Value>) {
    let agent = headers
        .get("User-Agent")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if agent != camclient::USER_AGENT {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("unsupported client: {agent}") })),
        );
    }
    if form.token != TOKEN {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid token" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "message": "Login successful",
            "data": {
                "id": 7,
                "email": "ada@example.com",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "my_cameras_count": 2,
                "shared_cameras_count": 1,
                "total_cameras_count": 3,
                "available_features": { "timeline": true }
            }
        })),
    )
}

async fn cameras(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    Ok(Json(json!({
        "cameras": {
            "count": 2,
            "results": [
                {
                    "id": CAMERA,
                    "name": "Front door",
                    "type": "ip",
                    "status": "online",
                    "has_recording": true
                },
                { "id": 43, "name": "Garage", "status": "offline" }
            ]
        }
    })))
}

async fn stream(headers: HeaderMap, Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    match id {
        CAMERA => Ok(Json(json!({
            "stream_details": [
                { "format": "mjpeg", "url": "https://cdn.example.com/42/live.mjpeg" },
                { "format": "webrtc", "url": "https://cdn.example.com/42/whep" },
                { "format": "mp4", "url": "https://cdn.example.com/42/live.mp4" }
            ]
        }))),
        MISSING_CAMERA => Err(StatusCode::NOT_FOUND),
        _ => Ok(Json(json!({ "stream_details": [] }))),
    }
}

async fn recording_timeline(
    headers: HeaderMap,
    Path(id): Path<u64>,
    Query(range): Query<Range>,
) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    if id == MISSING_CAMERA {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let segments: Vec<Value> = recorded_segments()
        .into_iter()
        .filter(|(start, end)| *start >= range.start && *end <= range.end)
        .map(|(start, end)| json!({ "start": start, "end": end }))
        .collect();
    Ok(Json(json!({ "timeline": { "segments": segments } })))
}

async fn recording_stream(
    headers: HeaderMap,
    Path(id): Path<u64>,
    Query(range): Query<Range>,
) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    if !recorded_segments()
        .iter()
        .any(|(start, end)| *start == range.start && *end == range.end)
    {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "stream": { "url": segment_url(id, range.start) } })))
}

/// Starts the mock REST API and returns its base url.
pub async fn serve() -> String {
    let app = Router::new().nest(
        "/api",
        Router::new()
            .route("/login/", post(login))
            .route("/cameras/", get(cameras))
            .route("/stream/:id/", get(stream))
            .route("/recording-timeline/:id/", get(recording_timeline))
            .route("/recording-stream/:id/", get(recording_stream)),
    );

    let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}/api")
}

pub async fn client() -> camclient::Client {
    camclient::Client::new(serve().await, Some(Duration::from_secs(5))).unwrap()
}

/// Media surface that records what happens to it.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    pub events: Arc<Mutex<Vec<String>>>,
}

impl RecordingSurface {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

pub struct RecordingHandle {
    url: String,
    events: Arc<Mutex<Vec<String>>>,
}

impl MediaSurface for RecordingSurface {
    type Handle = RecordingHandle;

    fn attach(&mut self, url: &str) -> anyhow::Result<RecordingHandle> {
        self.events.lock().unwrap().push(format!("attach {url}"));
        Ok(RecordingHandle {
            url: url.to_string(),
            events: self.events.clone(),
        })
    }
}

impl MediaHandle for RecordingHandle {
    fn url(&self) -> &str {
        &self.url
    }

    fn seek(&mut self, position: Duration) -> anyhow::Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(format!("seek {} {}", self.url, position.as_secs()));
        Ok(())
    }
}

impl Drop for RecordingHandle {
    fn drop(&mut self) {
        self.events
            .lock()
            .unwrap()
            .push(format!("release {}", self.url));
    }
}
