//! Error response constructors for the HTTP surface.
//!
//! Every client-visible failure uses a fixed `{"error": "<message>"}` JSON
//! body; upstream detail is logged server-side only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

pub fn create_error(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

pub fn bad_request(message: &str) -> Response {
    create_error(StatusCode::BAD_REQUEST, message)
}

pub fn forbidden(message: &str) -> Response {
    create_error(StatusCode::FORBIDDEN, message)
}

pub fn internal_error(message: &str) -> Response {
    create_error(StatusCode::INTERNAL_SERVER_ERROR, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_string(&ErrorBody {
            error: "Missing required fields",
        })
        .unwrap();
        assert_eq!(body, r#"{"error":"Missing required fields"}"#);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(
            internal_error("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
