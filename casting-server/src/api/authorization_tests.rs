//! End-to-end authorization behavior through the full router and a mocked
//! identity provider.

use crate::models::MovieListResponse;
use crate::test_utils::{TestFixture, JWKS_PATH};
use casting_auth::testing::{test_jwks, TokenBuilder, TEST_KID};
use http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use http::{Method, StatusCode};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_granted_permission_is_authorized() {
    let fixture = TestFixture::new().await;
    fixture.seed_demo().await;
    let token = fixture.token(&["get:movies"]);

    let response = fixture.get("/movies", &token).await;
    response.assert_ok();
    let body = response.json_as::<MovieListResponse>();
    assert!(body.success);
    assert_eq!(body.movies.len(), 3);
}

#[tokio::test]
async fn test_same_token_without_delete_permission_is_forbidden() {
    let fixture = TestFixture::new().await;
    fixture.seed_demo().await;
    let token = fixture.token(&["get:movies"]);

    fixture.get("/movies/1", &token).await.assert_ok();

    let response = fixture.delete("/movies/1", &token).await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json, json!({"message": "Permission not found."}));

    // Nothing was deleted
    fixture.get("/movies/1", &token).await.assert_ok();
}

#[tokio::test]
async fn test_missing_header() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/actors", "").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json,
        json!({"message": "Authorization header is expected."})
    );
}

#[tokio::test]
async fn test_malformed_headers() {
    let fixture = TestFixture::new().await;
    let token = fixture.token(&["get:actors"]);

    for header in [
        "Bearer".to_string(),
        "Bearer ".to_string(),
        format!("bearer {token}"),
        format!("Basic {token}"),
        format!("Bearer {token} extra"),
        token.clone(),
    ] {
        let request = http::Request::builder()
            .uri("/actors")
            .header("Authorization", &header)
            .body(axum::body::Body::empty())
            .unwrap();
        let response = fixture.send(request).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json,
            json!({"message": "Authorization malformed."}),
            "{header}"
        );
    }
}

#[tokio::test]
async fn test_symmetric_token_is_rejected() {
    let fixture = TestFixture::new().await;
    let token = TokenBuilder::new()
        .permissions(&["get:actors"])
        .sign_hs256(b"guessable");

    let response = fixture.get("/actors", &token).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json,
        json!({"message": "Unable to parse authentication token."})
    );
}

#[tokio::test]
async fn test_expired_token() {
    let fixture = TestFixture::new().await;
    let token = TokenBuilder::new()
        .permissions(&["get:movies"])
        .expires_in(-1)
        .sign();

    let response = fixture.get("/movies", &token).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json, json!({"message": "Token expired."}));
}

#[tokio::test]
async fn test_wrong_audience() {
    let fixture = TestFixture::new().await;
    assert_ne!(fixture.settings.auth.audience, "billing");
    let token = TokenBuilder::new()
        .audience(json!("billing"))
        .permissions(&["get:movies"])
        .sign();

    let response = fixture.get("/movies", &token).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json,
        json!({"message": "Incorrect claims. Please, check the audience and issuer."})
    );
}

#[tokio::test]
async fn test_missing_permissions_claim_differs_from_missing_permission() {
    let fixture = TestFixture::new().await;

    let no_claim = TokenBuilder::new().sign();
    let response = fixture.get("/movies", &no_claim).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json,
        json!({"message": "Permissions not included in JWT."})
    );

    let other_permission = fixture.token(&["get:actors"]);
    fixture
        .get("/movies", &other_permission)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_key_id() {
    let fixture = TestFixture::new().await;
    let token = TokenBuilder::new()
        .kid(Some("rotated-away"))
        .permissions(&["get:movies"])
        .sign();

    let response = fixture.get("/movies", &token).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json,
        json!({"message": "Unable to find the appropriate key."})
    );
}

#[tokio::test]
async fn test_key_set_unreachable() {
    let fixture = TestFixture::without_keys().await;
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&fixture.jwks_mock)
        .await;

    let response = fixture.get("/movies", &fixture.token(&["get:movies"])).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json,
        json!({"message": "Unable to fetch signing keys."})
    );
}

#[tokio::test]
async fn test_keys_fetched_once_for_many_requests() {
    let fixture = TestFixture::without_keys().await;
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_jwks()))
        .expect(1)
        .mount(&fixture.jwks_mock)
        .await;

    let token = fixture.token(&["get:movies"]);
    let (a, b, c, d) = tokio::join!(
        fixture.get("/movies", &token),
        fixture.get("/movies", &token),
        fixture.get("/movies", &token),
        fixture.get("/movies", &token),
    );
    for response in [a, b, c, d] {
        response.assert_ok();
    }
    assert_eq!(fixture.state.keys_loaded().await, 1);
}

#[tokio::test]
async fn test_key_rotation_is_picked_up() {
    let fixture = TestFixture::without_keys().await;

    let mut rotated = test_jwks();
    rotated["keys"][0]["kid"] = json!("next-key");
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_jwks()))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&fixture.jwks_mock)
        .await;
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(&rotated))
        .with_priority(2)
        .mount(&fixture.jwks_mock)
        .await;

    let current = fixture.token(&["get:movies"]);
    fixture.get("/movies", &current).await.assert_ok();

    let next = TokenBuilder::new()
        .kid(Some("next-key"))
        .permissions(&["get:movies"])
        .sign();
    fixture.get("/movies", &next).await.assert_ok();

    // The rotated set no longer carries the first key id
    let snapshot = fixture.state.authorizer.keys().snapshot().await;
    assert!(snapshot.get(TEST_KID).is_none());
    assert!(snapshot.get("next-key").is_some());
}

#[tokio::test]
async fn test_rejections_carry_cors_headers() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/movies", "").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_preflight_needs_no_token() {
    let fixture = TestFixture::new().await;
    let request = fixture
        .request_builder(Method::OPTIONS, "/movies", "")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = fixture.send(request).await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(response.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

