//! JSON error responses.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use climate_common::DashboardError;
use serde::Serialize;

pub type ApiResult<T> = Result<T, ApiError>;

/// An error returned to the front end as `{"error": kind, "message": text}`,
/// plus a placeholder for dashboard errors.
#[derive(Debug)]
pub enum ApiError {
    Dashboard(DashboardError),
    /// Malformed query parameter or body
    BadRequest(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    /// Text the front end shows in place of the missing chart or map
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Dashboard(e) => {
                StatusCode::from_u16(e.http_status_code()).unwrap_or(StatusCode::BAD_REQUEST)
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::Dashboard(e) => ErrorBody {
                error: e.code().to_string(),
                message: e.to_string(),
                placeholder: Some(e.placeholder()),
            },
            ApiError::BadRequest(msg) => ErrorBody {
                error: "BadRequest".to_string(),
                message: msg.clone(),
                placeholder: None,
            },
        }
    }
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        ApiError::Dashboard(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
