use axum::{
    Router,
    extract::{
        DefaultBodyLimit, FromRef, Request,
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use dennicek_common::model::{Id, ValidationError, post::PostMarker};
use dennicek_db::{DbError, store::Store};
use json::Json;
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::Arc};
use thiserror::Error;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::error;

mod json;
mod routes;
#[cfg(test)]
mod testing;

/// Drawings arrive as data URLs inside JSON, so bodies can get large.
pub const BODY_LIMIT_BYTES: usize = 50 * 1024 * 1024;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, Debug, FromRef)]
pub struct ServerState {
    pub store: Arc<dyn Store>,
}

/// The complete application: the JSON api under `/api`, and the built client from
/// `client_dist` for every other path if given.
pub fn app(state: ServerState, client_dist: Option<&Path>) -> Router {
    let api = routes::routes().fallback(fallback);
    let router = ServerRouter::new().nest("/api", api);

    let router = match client_dist {
        Some(dist) => {
            // Client side routes all resolve to the single page.
            let index = ServeFile::new(dist.join("index.html"));
            router.fallback_service(ServeDir::new(dist).fallback(index))
        }
        None => router.fallback(fallback),
    };

    router
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Incoming JSON rejected: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("JSON response could not be serialized: {0}")]
    JsonResponse(#[from] serde_json::Error),
    #[error("Incoming multipart form rejected: {0}")]
    MultipartRejection(#[from] MultipartRejection),
    #[error("Multipart form could not be read: {0}")]
    Multipart(#[from] MultipartError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("Post with id {0} was not found.")]
    PostByIdNotFound(Id<PostMarker>),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_)
            | ServerError::PathRejection(_)
            | ServerError::PostByIdNotFound(_) => StatusCode::NOT_FOUND,
            // 413 when over the body limit.
            ServerError::JsonRejection(JsonRejection::BytesRejection(rejection)) => {
                rejection.status()
            }
            ServerError::JsonRejection(_) | ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::MultipartRejection(rejection) => rejection.status(),
            ServerError::Multipart(err) => err.status(),
            ServerError::JsonResponse(_) | ServerError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
struct ErrorResponse {
    status: u16,
    message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        error!(error = %self, %status, "Replying with error");

        // Storage failures stay in the logs.
        let message = if status.is_server_error() {
            status
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_owned()
        } else {
            self.to_string()
        };

        let error_response = ErrorResponse {
            status: status.as_u16(),
            message,
        };
        (status, Json(error_response)).into_response()
    }
}
