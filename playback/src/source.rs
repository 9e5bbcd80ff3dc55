use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use api::recorder::RecordingSegment;
use api::request::TimelineQuery;
use api::stream::StreamDescriptor;

/// The REST endpoints the controller depends on.
#[async_trait]
pub trait CameraApi: Send + Sync {
    async fn stream_details(
        &self,
        credential: &str,
        camera_id: u64,
    ) -> Result<Vec<StreamDescriptor>>;

    async fn recording_timeline(
        &self,
        credential: &str,
        camera_id: u64,
        query: &TimelineQuery,
    ) -> Result<Vec<RecordingSegment>>;

    /// Resolves the playable (HLS) url of one recorded segment.
    async fn recording_stream(
        &self,
        credential: &str,
        camera_id: u64,
        segment: &RecordingSegment,
    ) -> Result<String>;
}

#[async_trait]
impl CameraApi for camclient::Client {
    async fn stream_details(
        &self,
        credential: &str,
        camera_id: u64,
    ) -> Result<Vec<StreamDescriptor>> {
        camclient::Client::stream_details(self, credential, camera_id).await
    }

    async fn recording_timeline(
        &self,
        credential: &str,
        camera_id: u64,
        query: &TimelineQuery,
    ) -> Result<Vec<RecordingSegment>> {
        camclient::Client::recording_timeline(self, credential, camera_id, query).await
    }

    async fn recording_stream(
        &self,
        credential: &str,
        camera_id: u64,
        segment: &RecordingSegment,
    ) -> Result<String> {
        camclient::Client::recording_stream(self, credential, camera_id, segment).await
    }
}

#[async_trait]
impl<T: CameraApi + ?Sized> CameraApi for Arc<T> {
    async fn stream_details(
        &self,
        credential: &str,
        camera_id: u64,
    ) -> Result<Vec<StreamDescriptor>> {
        (**self).stream_details(credential, camera_id).await
    }

    async fn recording_timeline(
        &self,
        credential: &str,
        camera_id: u64,
        query: &TimelineQuery,
    ) -> Result<Vec<RecordingSegment>> {
        (**self).recording_timeline(credential, camera_id, query).await
    }

    async fn recording_stream(
        &self,
        credential: &str,
        camera_id: u64,
        segment: &RecordingSegment,
    ) -> Result<String> {
        (**self).recording_stream(credential, camera_id, segment).await
    }
}
