use crate::store::StoreError;
use axum::response::IntoResponse;
use axum::Json;
use casting_auth::AuthError;
use http::StatusCode;
use log::debug;
use serde_json::json;

/// A non-authorization failure rendered as
/// `{"success": false, "error": <status>, "message": ...}`
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub message: &'static str,
    pub status_code: StatusCode,
}

impl ApiError {
    /// Create a new ApiError with a message and status code
    pub fn new(message: &'static str, status_code: StatusCode) -> Self {
        Self {
            message,
            status_code,
        }
    }

    /// Missing or invalid fields (400)
    pub fn bad_request() -> Self {
        Self::new("bad request", StatusCode::BAD_REQUEST)
    }

    /// Unknown entity or path (404)
    pub fn not_found() -> Self {
        Self::new("resource not found", StatusCode::NOT_FOUND)
    }

    /// Body is not a JSON object (422)
    pub fn unprocessable() -> Self {
        Self::new("unprocessable", StatusCode::UNPROCESSABLE_ENTITY)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        debug!("Store rejected request: {}", err);
        match err {
            StoreError::NotFound { .. } => Self::not_found(),
            StoreError::UnknownActor(_) => Self::bad_request(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code;
        let body = json!({
            "success": false,
            "error": status_code.as_u16(),
            "message": self.message,
        });
        (status_code, Json(body)).into_response()
    }
}

/// An authorization failure rendered as `{"message": ...}` with the error's status
#[derive(Debug, Clone, PartialEq)]
pub struct AuthRejection(pub AuthError);

impl From<AuthError> for AuthRejection {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> axum::response::Response {
        let body = json!({
            "message": self.0.to_string(),
        });
        (self.0.status(), Json(body)).into_response()
    }
}
