use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::RecruitError;

/// Response wrapper turning [`RecruitError`] into a JSON error body.
#[derive(Debug)]
pub struct AppError(pub RecruitError);

impl From<RecruitError> for AppError {
    fn from(err: RecruitError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self(RecruitError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self(RecruitError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self(RecruitError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = match &self.0 {
            RecruitError::InvalidTransition(rejected) => json!({
                "error": rejected.to_string(),
                "currentStatus": rejected.from,
                "requestedStatus": rejected.to,
                "allowedTransitions": rejected.allowed,
            }),
            err if err.is_client_error() => json!({ "error": err.to_string() }),
            err => {
                tracing::error!(error = %err, "request failed");
                json!({ "error": "Internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}
