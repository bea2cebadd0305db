use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lectio_passage::PassageError;
use serde::Serialize;
use tracing::{debug, error};
use utoipa::ToSchema;

/// Wire form of a failed request.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Stable machine-readable code, e.g. `NO_SUCH_KEY`.
    pub code: &'static str,
    pub message: String,
}

/// Axum-facing wrapper turning a [`PassageError`] into a status code plus a
/// JSON body. Handlers return `Result<_, ApiError>` and use `?` freely.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub PassageError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PassageError::ModuleNotFound { .. } | PassageError::NoSuchKey { .. } => {
                StatusCode::NOT_FOUND
            }
            PassageError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            PassageError::TimedOut => StatusCode::GATEWAY_TIMEOUT,
            PassageError::Cancelled => StatusCode::REQUEST_TIMEOUT,
            PassageError::ModuleReadFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(code = self.0.code(), "Request failed: {}", self.0);
        } else {
            debug!(code = self.0.code(), "Request rejected: {}", self.0);
        }
        (status, Json(ErrorBody { code: self.0.code(), message: self.0.to_string() }))
            .into_response()
    }
}
