use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ApiResponse;
use service::customer::CustomerError;
use thiserror::Error;
use tracing::{error, warn};

/// Request failure rendered as a failed envelope.
#[derive(Debug)]
pub enum ApiError {
    Customer(CustomerError),
    /// The request could not be extracted (bad path id, malformed body or query).
    Rejected { status: StatusCode, message: String },
}

impl From<CustomerError> for ApiError {
    fn from(e: CustomerError) -> Self { Self::Customer(e) }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self { Self::Rejected { status: r.status(), message: r.body_text() } }
}

impl From<PathRejection> for ApiError {
    fn from(r: PathRejection) -> Self { Self::Rejected { status: r.status(), message: r.body_text() } }
}

impl From<QueryRejection> for ApiError {
    fn from(r: QueryRejection) -> Self { Self::Rejected { status: r.status(), message: r.body_text() } }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Customer(CustomerError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Customer(CustomerError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Customer(CustomerError::Unexpected { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Customer(e) => {
                let code = e.code();
                if status.is_server_error() {
                    error!(code, error = %e, "request failed");
                } else {
                    warn!(code, error = %e, "request rejected");
                }
                e.to_string()
            }
            ApiError::Rejected { message, .. } => {
                warn!(status = status.as_u16(), error = %message, "request not extracted");
                message
            }
        };
        (status, Json(ApiResponse::<()>::fail(message))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
}
