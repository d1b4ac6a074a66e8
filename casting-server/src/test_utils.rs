use crate::config::Settings;
use crate::create_app;
use crate::models::NewActor;
use crate::state::AppState;
use crate::store::seed::seed_demo_data;
use axum::body::Body;
use axum::Router;
use casting_auth::testing::{test_jwks, TokenBuilder};
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

pub(crate) const JWKS_PATH: &str = "/.well-known/jwks.json";

/// Test fixture for setting up a complete test environment with a mocked identity provider.
///
/// The fixture starts a mock server publishing the test signing keys, builds the
/// application against it, and offers helpers for sending requests with tokens
/// signed by the matching private key.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///     let token = fixture.token(&["get:movies"]);
///
///     let response = fixture.get("/movies", &token).await;
///     response.assert_ok();
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration settings
    pub settings: Settings,
    /// Application state shared with the router
    pub state: AppState,
    /// Mock server publishing the key set
    pub jwks_mock: MockServer,
}

impl TestFixture {
    /// Creates a new fixture whose key set endpoint serves the test keys.
    pub async fn new() -> Self {
        let fixture = Self::without_keys().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(test_jwks()))
            .mount(&fixture.jwks_mock)
            .await;
        fixture
    }

    /// Creates a new fixture whose key set endpoint has no mocks mounted yet.
    pub async fn without_keys() -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let jwks_mock = MockServer::start().await;
        let settings = Settings::for_test_with_jwks(&jwks_mock);

        let state = AppState::new(settings.clone())
            .await
            .expect("Failed to build test state");
        let app = create_app(state.clone()).await;

        Self {
            app,
            settings,
            state,
            jwks_mock,
        }
    }

    /// Initializes the test logger with customized settings.
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Signs a valid token granting `permissions`
    pub fn token(&self, permissions: &[&str]) -> String {
        TokenBuilder::new().permissions(permissions).sign()
    }

    /// Loads the fixed demo catalog
    pub async fn seed_demo(&self) {
        seed_demo_data(self.state.store.as_ref())
            .await
            .expect("Failed to seed demo data");
    }

    /// Inserts one actor directly into the store and returns its id
    pub async fn seed_actor(&self, name: &str) -> u64 {
        self.state
            .store
            .insert_actor(NewActor {
                name: name.to_string(),
                age: 30,
                gender: "female".to_string(),
            })
            .await
            .expect("Failed to insert actor")
    }

    /// Creates a request builder with a JSON content type.
    ///
    /// An empty `token` sends no `Authorization` header.
    pub fn request_builder(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: &str,
    ) -> http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri.as_ref());

        if !token.is_empty() {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder.header("Content-Type", "application/json")
    }

    /// Sends a GET request to the specified URI.
    pub async fn get(&self, uri: impl AsRef<str>, token: &str) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri, token)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a POST request with a JSON body to the specified URI.
    pub async fn post<T: Serialize>(
        &self,
        uri: impl AsRef<str>,
        token: &str,
        body: &T,
    ) -> TestResponse {
        self.with_json(Method::POST, uri, token, body).await
    }

    /// Sends a POST request with an arbitrary body.
    pub async fn post_raw(&self, uri: impl AsRef<str>, token: &str, body: &str) -> TestResponse {
        let request = self
            .request_builder(Method::POST, uri, token)
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a PATCH request with a JSON body to the specified URI.
    pub async fn patch<T: Serialize>(
        &self,
        uri: impl AsRef<str>,
        token: &str,
        body: &T,
    ) -> TestResponse {
        self.with_json(Method::PATCH, uri, token, body).await
    }

    /// Sends a DELETE request to the specified URI.
    pub async fn delete(&self, uri: impl AsRef<str>, token: &str) -> TestResponse {
        let request = self
            .request_builder(Method::DELETE, uri, token)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    async fn with_json<T: Serialize>(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        token: &str,
        body: &T,
    ) -> TestResponse {
        let json_body = serde_json::to_vec(body).expect("Failed to serialize body to JSON");
        let request = self
            .request_builder(method, uri, token)
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request and returns a TestResponse.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        // Try to parse as JSON, defaulting to empty object if parsing fails or empty body
        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| serde_json::json!({}))
        } else {
            serde_json::json!({})
        };

        TestResponse {
            status,
            headers,
            json,
        }
    }
}

/// Response from a test request that provides convenient access to status and JSON body.
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body as JSON (if present and valid JSON)
    pub json: Value,
}

impl TestResponse {
    /// Asserts that the response has the expected status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match the expected value.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            serde_json::to_string_pretty(&self.json).unwrap_or_default()
        );
        self
    }

    /// Asserts that the response status is OK (200).
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// Converts the response body to the specified type.
    ///
    /// # Panics
    ///
    /// Panics if deserialization fails.
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response JSON")
    }
}
