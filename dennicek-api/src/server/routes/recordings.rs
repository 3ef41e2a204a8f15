use crate::server::{Result, ServerError, ServerRouter, json::Json, routes::Created};
use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};
use axum_extra::routing::{RouterExt, TypedPath};
use dennicek_common::model::recording::{NewRecording, Recording, RecordingMarker};
use dennicek_db::store::Store;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(list_recordings)
        .typed_post(create_recording)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/recordings", rejection(ServerError))]
struct RecordingsPath();

async fn list_recordings(
    RecordingsPath(): RecordingsPath,
    State(store): State<Arc<dyn Store>>,
) -> Result<Json<Vec<Recording>>> {
    let recordings = store.fetch_recordings().await?;

    Ok(Json(recordings))
}

/// Expects the text fields `author` and `subject` and the audio file as `recording`.
async fn create_recording(
    RecordingsPath(): RecordingsPath,
    State(store): State<Arc<dyn Store>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Created<RecordingMarker>>)> {
    let mut multipart = multipart?;

    let mut author = String::new();
    let mut subject = String::new();
    let mut audio = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(ToOwned::to_owned);
        match name.as_deref() {
            Some("author") => author = field.text().await?,
            Some("subject") => subject = field.text().await?,
            Some("recording") => audio = field.bytes().await?.to_vec(),
            _ => debug!(?name, "Ignoring unexpected form field"),
        }
    }

    let recording = NewRecording::new(author, subject, audio)?;
    let id = store.create_recording(&recording).await?;

    Ok((
        StatusCode::CREATED,
        Json(Created {
            message: "Recording saved successfully",
            id,
        }),
    ))
}
