//! Uniform response envelope
//!
//! Success responses share the `{"data": {...}}` wire shape with errors;
//! handlers build an [`ApiResponse`] carrying the status code and the
//! payload that goes inside the envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

/// A status code paired with the payload for the `data` envelope
#[derive(Debug)]
pub struct ApiResponse {
    pub status_code: StatusCode,
    pub data: Value,
}

impl ApiResponse {
    pub fn new(status_code: StatusCode, data: Value) -> Self {
        Self { status_code, data }
    }

    /// 200 response
    pub fn ok(data: Value) -> Self {
        Self::new(StatusCode::OK, data)
    }

    /// 201 response
    pub fn created(data: Value) -> Self {
        Self::new(StatusCode::CREATED, data)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status_code, Json(json!({ "data": self.data }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_status() {
        let resp = ApiResponse::ok(json!({ "apartments": [] }));
        assert_eq!(resp.status_code, StatusCode::OK);
    }

    #[test]
    fn test_created_status() {
        let resp = ApiResponse::created(json!({ "message": "created" }));
        assert_eq!(resp.status_code, StatusCode::CREATED);
    }
}
