use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Response, StatusCode,
};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use api::path;
use api::recorder::{RecordingSegment, RecordingStreamResponse, TimelineResponse};
use api::request::{Login, TimelineQuery};
use api::response::{Camera, CameraListResponse, LoginResponse};
use api::stream::{StreamDescriptor, StreamDetailsResponse};

pub const USER_AGENT: &str = concat!("camdeck/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct Client {
    url: String,
    http: reqwest::Client,
}

impl Client {
    pub fn get_auth_header_map(token: &str) -> Result<HeaderMap> {
        let mut header_map = HeaderMap::new();
        header_map.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
        Ok(header_map)
    }

    /// `url` is the API root, e.g. `https://example.com/api`; endpoint paths are appended to it.
    pub fn new(url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Client {
            url: url.trim_end_matches('/').to_owned(),
            http: builder.build()?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Exchanges a personal access token for the account summary.
    pub async fn login(&self, token: &str) -> Result<LoginResponse> {
        let url = format!("{}{}", self.url, path::LOGIN);
        debug!("POST {}", url);
        let response = self
            .http
            .post(url)
            .form(&Login {
                token: token.to_owned(),
            })
            .send()
            .await?;
        let status = response.status();
        match response.json::<LoginResponse>().await {
            Ok(body) if status.is_success() && body.data.is_some() => Ok(body),
            Ok(body) if status.is_success() => Err(anyhow!(body
                .error
                .unwrap_or_else(|| "login response has no account data".to_owned()))),
            Ok(body) => Err(anyhow!(body
                .error
                .unwrap_or_else(|| "login failed".to_owned()))),
            Err(_) => Err(anyhow!(status_error(status))),
        }
    }

    pub async fn cameras(&self, token: &str) -> Result<Vec<Camera>> {
        let res: CameraListResponse = self
            .get_json(token, path::CAMERAS)
            .await
            .context("failed to fetch cameras")?;
        Ok(res.cameras.results)
    }

    pub async fn stream_details(
        &self,
        token: &str,
        camera_id: u64,
    ) -> Result<Vec<StreamDescriptor>> {
        let res: StreamDetailsResponse = self
            .get_json(token, &path::stream(camera_id))
            .await
            .context("failed to fetch stream details")?;
        Ok(res.stream_details)
    }

    pub async fn recording_timeline(
        &self,
        token: &str,
        camera_id: u64,
        query: &TimelineQuery,
    ) -> Result<Vec<RecordingSegment>> {
        let res: TimelineResponse = self
            .get_json(token, &path::recording_timeline(camera_id, query)?)
            .await
            .context("failed to fetch recording timeline")?;
        Ok(res.timeline.segments)
    }

    pub async fn recording_stream(
        &self,
        token: &str,
        camera_id: u64,
        segment: &RecordingSegment,
    ) -> Result<String> {
        let res: RecordingStreamResponse = self
            .get_json(token, &path::recording_stream(camera_id, segment)?)
            .await
            .context("failed to fetch segment stream url")?;
        Ok(res.stream.url)
    }

    async fn get_json<T: DeserializeOwned>(&self, token: &str, path: &str) -> Result<T> {
        let header_map = Self::get_auth_header_map(token)?;
        let url = format!("{}{}", self.url, path);
        debug!("GET {}", url);
        let response = self.http.get(url).headers(header_map).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(get_response_error(response).await));
        }
        let body = response.bytes().await?;
        trace!("response body: {} bytes", body.len());
        Ok(serde_json::from_slice(&body)?)
    }
}

async fn get_response_error(response: Response) -> String {
    match response.status() {
        StatusCode::INTERNAL_SERVER_ERROR => {
            response.text().await.unwrap_or("server error".to_owned())
        }
        status => status_error(status),
    }
}

fn status_error(status: StatusCode) -> String {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            "identity authentication failed".to_owned()
        }
        StatusCode::NOT_FOUND => "resource not exists".to_owned(),
        _ => format!("{}", status),
    }
}
