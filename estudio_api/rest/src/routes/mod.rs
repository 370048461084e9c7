use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ApiError;

pub mod contact;
pub mod health;

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err}");
    error(StatusCode::INTERNAL_SERVER_ERROR, "SERVER_ERROR")
}

fn error(code: StatusCode, error_code: &'static str) -> Response {
    (
        code,
        Json(ApiError {
            success: false,
            error_code,
        }),
    )
        .into_response()
}
