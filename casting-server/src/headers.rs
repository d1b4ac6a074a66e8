use axum::body::Body;
use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use http::{Method, StatusCode};

/// Cross-origin headers added to every response
#[derive(Debug, Clone)]
pub struct CorsHeaders {
    allow_origin: HeaderValue,
    allow_headers: HeaderValue,
    allow_methods: HeaderValue,
}

impl Default for CorsHeaders {
    fn default() -> Self {
        Self {
            allow_origin: HeaderValue::from_static("*"),
            allow_headers: HeaderValue::from_static("Content-Type, Authorization"),
            allow_methods: HeaderValue::from_static("GET, PATCH, POST, DELETE, OPTIONS"),
        }
    }
}

impl CorsHeaders {
    /// Create a new CorsHeaders instance with permissive defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply headers to a response
    pub fn apply<B>(&self, response: &mut axum::response::Response<B>) {
        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
    }
}

/// Answers preflight requests directly and decorates every other response.
///
/// Sits outside authorization, so a preflight never needs a token.
pub(crate) async fn cors_middleware(request: Request, next: Next) -> Response {
    let cors = CorsHeaders::new();

    let mut response = if request.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        response
    } else {
        next.run(request).await
    };

    cors.apply(&mut response);
    response
}
