use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use modstats_core::{ErrorKind, ModStatsError};
use serde_json::json;
use tracing::{debug, warn};

/// A core error on its way out as a JSON response.
#[derive(Debug)]
pub struct ApiError(pub ModStatsError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Semantic => StatusCode::BAD_REQUEST,
            ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Transport | ErrorKind::Structural | ErrorKind::Conversion => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<ModStatsError> for ApiError {
    fn from(err: ModStatsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self.0, status = status.as_u16(), "request failed");
        } else {
            debug!(error = %self.0, status = status.as_u16(), "request rejected");
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
