//! HTTP-level tests for the session gates and the admin catalog API.
//! The MySQL pool is lazy, so everything here sticks to routes that never
//! touch the user table (or are rejected by a gate before reaching it).

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use tempfile::TempDir;
use tower::ServiceExt;

use fitserve::config::Config;
use fitserve::server::{build_state, router};

fn test_app(tmp: &TempDir) -> Router {
    let public_dir = tmp.path().join("public");
    std::fs::create_dir_all(&public_dir).unwrap();
    std::fs::write(public_dir.join("pagenotfound.html"), "<h1>nothing here</h1>").unwrap();
    let config = Config {
        port: 0,
        db_host: "127.0.0.1".into(),
        db_user: "test".into(),
        db_password: "test".into(),
        db_name: "fit_test".into(),
        admin_user: "admin".into(),
        admin_pass: "hunter2".into(),
        groq_api_key: None,
        data_dir: tmp.path().join("data"),
        public_dir,
    };
    router(build_state(config).unwrap())
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, serde_json::Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, headers, body)
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

fn get_with_cookie(path: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn json_req(method: &str, path: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Pull the `sid=...` pair out of a Set-Cookie header.
fn sid_cookie(headers: &HeaderMap) -> String {
    let set_cookie = headers
        .get(header::SET_COOKIE)
        .expect("Set-Cookie missing")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn admin_login(app: &Router) -> String {
    let (status, headers, _) = send(
        app,
        json_req("POST", "/api/admin/login", None, serde_json::json!({
            "username": "admin",
            "password": "hunter2"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    sid_cookie(&headers)
}

#[tokio::test]
async fn admin_session_lifecycle() {
    let tmp = TempDir::new().unwrap();
    let app = test_app(&tmp);

    // No cookie: gate short-circuits
    let (status, _, body) = send(&app, get("/api/admin/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Not authenticated");

    // Wrong credentials
    let (status, _, _) = send(
        &app,
        json_req("POST", "/api/admin/login", None, serde_json::json!({
            "username": "admin",
            "password": "wrong"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Right credentials: cookie carries the expected attributes
    let (status, headers, _) = send(
        &app,
        json_req("POST", "/api/admin/login", None, serde_json::json!({
            "username": "admin",
            "password": "hunter2"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let set_cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.starts_with("sid="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    let cookie = sid_cookie(&headers);

    // Session holds
    let (status, _, _) = send(&app, get_with_cookie("/api/admin/me", &cookie)).await;
    assert_eq!(status, StatusCode::OK);

    // Admin session never satisfies the user gate
    let (status, _, _) = send(&app, get_with_cookie("/api/me", &cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Logout clears the record and the cookie
    let (status, headers, _) = send(
        &app,
        json_req("POST", "/api/admin/logout", Some(&cookie), serde_json::Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let cleared = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));

    let (status, _, _) = send(&app, get_with_cookie("/api/admin/me", &cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_routes_require_a_session() {
    let tmp = TempDir::new().unwrap();
    let app = test_app(&tmp);

    let (status, _, _) = send(&app, get("/api/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(
        &app,
        json_req("PUT", "/api/me", None, serde_json::json!({"name": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Stale cookie from a restarted process resolves to no session
    let (status, _, _) = send(&app, get_with_cookie("/api/me", "sid=stale-id")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_catalog_reads_need_no_auth() {
    let tmp = TempDir::new().unwrap();
    let app = test_app(&tmp);

    let (status, _, body) = send(&app, get("/api/memberships")).await;
    assert_eq!(status, StatusCode::OK);
    let plans = body.as_array().unwrap();
    assert_eq!(plans.len(), 3);
    assert_eq!(plans[0]["name"], "Basic");
    assert!(plans[0]["priceINR"].is_number());

    let (status, _, body) = send(&app, get("/api/products")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));

    let (status, _, body) = send(&app, get("/api/videos")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn admin_catalog_crud_round_trip() {
    let tmp = TempDir::new().unwrap();
    let app = test_app(&tmp);
    let cookie = admin_login(&app).await;

    // Catalog writes are gated
    let payload = serde_json::json!({"name": "Whey", "priceUSD": 25, "priceINR": 2100});
    let (status, _, _) = send(&app, json_req("POST", "/api/admin/products", None, payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Create assigns ids 1, 2 — string prices are accepted like numeric ones
    let (status, _, body) = send(&app, json_req("POST", "/api/admin/products", Some(&cookie), payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);

    let (status, _, body) = send(
        &app,
        json_req("POST", "/api/admin/products", Some(&cookie), serde_json::json!({
            "name": "Mat",
            "priceUSD": "12.5",
            "priceINR": "999"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 2);
    assert_eq!(body["priceUSD"], 12.5);

    // Patch one field, the rest survives
    let (status, _, body) = send(
        &app,
        json_req("PUT", "/api/admin/products/1", Some(&cookie), serde_json::json!({"priceUSD": 30})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["priceUSD"], 30.0);
    assert_eq!(body["name"], "Whey");

    // Delete, then not-found on the second attempt
    let (status, _, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/api/admin/products/2")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/api/admin/products/2")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Memberships: only price and link move; unknown plan is 404
    let (status, _, body) = send(
        &app,
        json_req("PUT", "/api/admin/memberships/2", Some(&cookie), serde_json::json!({
            "priceINR": 1499,
            "videoLink": "https://example.test/standard"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Standard");
    assert_eq!(body["priceINR"], 1499.0);

    let (status, _, _) = send(
        &app,
        json_req("PUT", "/api/admin/memberships/99", Some(&cookie), serde_json::json!({"priceINR": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Videos: missing url is a validation error
    let (status, _, body) = send(
        &app,
        json_req("POST", "/api/admin/videos", Some(&cookie), serde_json::json!({
            "title": "Morning yoga",
            "url": ""
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Title and url are required");

    let (status, _, body) = send(
        &app,
        json_req("POST", "/api/admin/videos", Some(&cookie), serde_json::json!({
            "title": "Morning yoga",
            "category": "yoga",
            "url": "https://example.test/v/1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
}

#[tokio::test]
async fn two_admin_sessions_are_independent() {
    let tmp = TempDir::new().unwrap();
    let app = test_app(&tmp);
    let first = admin_login(&app).await;
    let second = admin_login(&app).await;
    assert_ne!(first, second);

    let (status, _, _) = send(
        &app,
        json_req("POST", "/api/admin/logout", Some(&first), serde_json::Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The other session is untouched
    let (status, _, _) = send(&app, get_with_cookie("/api/admin/me", &second)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unmatched_paths_fall_back_to_the_not_found_page() {
    let tmp = TempDir::new().unwrap();
    let app = test_app(&tmp);

    let resp = app.clone().oneshot(get("/no/such/page")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("nothing here"));
}
