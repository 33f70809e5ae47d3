use crate::application::auth_service::SessionGateError;
use crate::application::dashboard_service::DashboardError;
use crate::domain::error::{CommandError, ValidationError};
use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error(transparent)]
    SessionGate(#[from] SessionGateError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::Dashboard(DashboardError::Command(CommandError::Validation(_)))
            | ApiError::SessionGate(SessionGateError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Multipart(e) => e.status(),
            ApiError::Dashboard(DashboardError::Command(CommandError::Transition(_))) => {
                StatusCode::CONFLICT
            }
            ApiError::Dashboard(DashboardError::Analysis(_)) => StatusCode::BAD_GATEWAY,
            ApiError::SessionGate(SessionGateError::Auth(_)) => StatusCode::UNAUTHORIZED,
            ApiError::SessionGate(SessionGateError::Storage(_))
            | ApiError::Dashboard(DashboardError::TaskFailed(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            tracing::error!("Internal server error: {:#}", self);
            "An unexpected error occurred.".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
