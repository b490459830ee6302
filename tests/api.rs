use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use catalog::{config::AuthConfig, db, rest, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    let pool = db::connect("sqlite::memory:")
        .await
        .expect("connect to in-memory database");
    rest::router(AppState::new(pool, AuthConfig::new("integration_secret")))
}

struct TestResponse {
    status: StatusCode,
    set_cookie: Option<String>,
    body: Value,
}

impl TestResponse {
    /// `name=value` part of the Set-Cookie header.
    fn cookie_pair(&self) -> Option<&str> {
        self.set_cookie
            .as_deref()
            .and_then(|c| c.split(';').next())
            .map(str::trim)
    }
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    cookie: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = auth {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        set_cookie,
        body,
    }
}

async fn register(app: &Router, email: &str, role: Option<&str>) -> String {
    let mut payload = json!({ "email": email, "password": "password123" });
    if let Some(role) = role {
        payload["role"] = json!(role);
    }
    let res = send(app, Method::POST, "/api/auth/register", None, None, Some(payload)).await;
    assert_eq!(res.status, StatusCode::CREATED);
    res.body["access_token"].as_str().unwrap().to_string()
}

async fn create_product(app: &Router, token: &str, name: &str) -> i64 {
    let res = send(
        app,
        Method::POST,
        "/api/products",
        Some(token),
        None,
        Some(json!({ "name": name, "price": 99.99, "category": "electronics" })),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED);
    res.body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn register_conflicts_on_duplicate_email() {
    let app = app().await;
    register(&app, "dup@example.com", None).await;

    let res = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        None,
        Some(json!({ "email": "dup@example.com", "password": "password123" })),
    )
    .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["error"], "Email already exists");
}

#[tokio::test]
async fn register_rejects_invalid_input() {
    let app = app().await;
    let res = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        None,
        Some(json!({ "email": "not-an-email", "password": "password123" })),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        None,
        Some(json!({ "email": "user@example.com" })),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["error"].is_string());
}

#[tokio::test]
async fn login_verify_logout_cycle() {
    let app = app().await;
    register(&app, "user@example.com", None).await;

    let bad = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        None,
        Some(json!({ "email": "user@example.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert!(bad.set_cookie.is_none());

    let login = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        None,
        Some(json!({ "email": "user@example.com", "password": "password123" })),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body, json!({ "success": true, "message": "Login successful" }));
    let set_cookie = login.set_cookie.as_deref().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));
    assert!(set_cookie.contains("Max-Age=86400"));
    let cookie = login.cookie_pair().unwrap().to_string();
    assert!(cookie.starts_with("auth_token="));

    let verified = send(&app, Method::GET, "/api/auth/verify", None, Some(&cookie), None).await;
    assert_eq!(verified.status, StatusCode::OK);
    assert_eq!(
        verified.body,
        json!({ "authenticated": true, "user": { "email": "user@example.com" } })
    );
    assert!(verified.set_cookie.is_none());

    let logout = send(&app, Method::POST, "/api/auth/logout", None, Some(&cookie), None).await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.body["success"], true);
    assert!(logout.cookie_pair().unwrap().starts_with("auth_token="));

    let again = send(&app, Method::POST, "/api/auth/logout", None, None, None).await;
    assert_eq!(again.body["success"], false);
}

#[tokio::test]
async fn verify_without_valid_cookie_is_unauthenticated() {
    let app = app().await;

    let none = send(&app, Method::GET, "/api/auth/verify", None, None, None).await;
    assert_eq!(none.status, StatusCode::OK);
    assert_eq!(none.body, json!({ "authenticated": false }));

    let junk = send(
        &app,
        Method::GET,
        "/api/auth/verify",
        None,
        Some("auth_token=not.a.token"),
        None,
    )
    .await;
    assert_eq!(junk.status, StatusCode::OK);
    assert_eq!(junk.body, json!({ "authenticated": false }));
}

#[tokio::test]
async fn products_require_authentication() {
    let app = app().await;
    let res = send(&app, Method::GET, "/api/products", None, None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = send(&app, Method::GET, "/api/products", Some("forged"), None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_cookie_authenticates_product_routes() {
    let app = app().await;
    register(&app, "user@example.com", None).await;
    let login = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        None,
        Some(json!({ "email": "user@example.com", "password": "password123" })),
    )
    .await;
    let cookie = login.cookie_pair().unwrap().to_string();

    let res = send(&app, Method::GET, "/api/products", None, Some(&cookie), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["totalItems"], 0);
}

#[tokio::test]
async fn product_crud_round() {
    let app = app().await;
    let token = register(&app, "user@example.com", None).await;

    let invalid = send(
        &app,
        Method::POST,
        "/api/products",
        Some(&token),
        None,
        Some(json!({ "name": "Freebie", "price": 0 })),
    )
    .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    let id = create_product(&app, &token, "Headphones").await;
    let uri = format!("/api/products/{id}");

    let fetched = send(&app, Method::GET, &uri, Some(&token), None, None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["name"], "Headphones");
    assert_eq!(fetched.body["revision"], 0);

    let patched = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&token),
        None,
        Some(json!({ "price": 79.5 })),
    )
    .await;
    assert_eq!(patched.status, StatusCode::OK);
    assert_eq!(patched.body["price"], 79.5);
    assert_eq!(patched.body["name"], "Headphones");
    assert_eq!(patched.body["revision"], 1);

    let missing = send(&app, Method::GET, "/api/products/9999", Some(&token), None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    let not_an_id = send(&app, Method::GET, "/api/products/abc", Some(&token), None, None).await;
    assert_eq!(not_an_id.status, StatusCode::NOT_FOUND);
    let patch_missing = send(
        &app,
        Method::PATCH,
        "/api/products/9999",
        Some(&token),
        None,
        Some(json!({ "name": "Ghost" })),
    )
    .await;
    assert_eq!(patch_missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_admin_only_and_single_shot() {
    let app = app().await;
    let user = register(&app, "user@example.com", None).await;
    let admin = register(&app, "admin@example.com", Some("admin")).await;

    let id = create_product(&app, &user, "Keyboard").await;
    let uri = format!("/api/products/{id}");

    let forbidden = send(&app, Method::DELETE, &uri, Some(&user), None, None).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let deleted = send(&app, Method::DELETE, &uri, Some(&admin), None, None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body, Value::Null);

    let again = send(&app, Method::DELETE, &uri, Some(&admin), None, None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_paginates() {
    let app = app().await;
    let token = register(&app, "user@example.com", None).await;
    for i in 0..15 {
        create_product(&app, &token, &format!("Item {i}")).await;
    }

    let first = send(
        &app,
        Method::GET,
        "/api/products?page=1&limit=10",
        Some(&token),
        None,
        None,
    )
    .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["data"].as_array().unwrap().len(), 10);
    assert_eq!(first.body["currentPage"], 1);
    assert_eq!(first.body["totalPages"], 2);
    assert_eq!(first.body["totalItems"], 15);

    let defaults = send(&app, Method::GET, "/api/products", Some(&token), None, None).await;
    assert_eq!(defaults.body["data"].as_array().unwrap().len(), 10);

    let bad = send(
        &app,
        Method::GET,
        "/api/products?page=0",
        Some(&token),
        None,
        None,
    )
    .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);

    let junk = send(
        &app,
        Method::GET,
        "/api/products?limit=lots",
        Some(&token),
        None,
        None,
    )
    .await;
    assert_eq!(junk.status, StatusCode::BAD_REQUEST);
}
