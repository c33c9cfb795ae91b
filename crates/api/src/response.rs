//! JSON response encoding.
//!
//! Bodies are serialized up front so an encoding failure surfaces as
//! [`AppError::Serialization`] (logged, sanitized 500) rather than a bare
//! plain-text error from `axum::Json`.

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::AppResult;

/// Serialize `value` as the JSON body of a response with `status`.
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> AppResult<Response> {
    let body = serde_json::to_vec(value)?;
    Ok((
        status,
        [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response())
}
