//! The `HTTPS_REQUIRED` error.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Raised when a plaintext request arrives and redirection is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Please use HTTPS when communicating with this server.")]
pub struct HttpsRequired;

impl HttpsRequired {
    pub const CODE: &'static str = "HTTPS_REQUIRED";

    pub fn code(&self) -> &'static str {
        Self::CODE
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::FORBIDDEN
    }
}

impl IntoResponse for HttpsRequired {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({
            "statusCode": status.as_u16(),
            "code": self.code(),
            "error": status.canonical_reason().unwrap_or_default(),
            "message": self.to_string(),
        });

        let mut response = (status, body.to_string()).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }
}
