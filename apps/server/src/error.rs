use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sitebook_core::cost_codes::CostCodeError;
use sitebook_core::errors::{DatabaseError, Error as CoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::CostCode(e) => match e {
            CostCodeError::DivisionNotFound(_)
            | CostCodeError::CostCodeNotFound(_)
            | CostCodeError::GlAccountNotFound(_) => StatusCode::NOT_FOUND,
            CostCodeError::DivisionInUse { .. } | CostCodeError::HasChildren { .. } => {
                StatusCode::CONFLICT
            }
            CostCodeError::InvalidHierarchy(_) => StatusCode::BAD_REQUEST,
        },
        CoreError::Database(e) => match e {
            DatabaseError::NotFound(_) => StatusCode::NOT_FOUND,
            DatabaseError::UniqueViolation(_) | DatabaseError::ForeignKeyViolation(_) => {
                StatusCode::CONFLICT
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        },
        CoreError::Repository(_) | CoreError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(e) => (core_status(e), e.to_string()),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ApiError::Anyhow(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", msg);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

/// Malformed bodies are reported as 400 with the usual error body instead of
/// axum's plain-text 415/422 responses.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
