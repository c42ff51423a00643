use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

async fn test_app(tag: &str) -> (Router, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "sprout-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let mut cfg = sprout::config::Config::default();
    cfg.database_url = format!("sqlite:{}", temp_path.display());
    cfg.jwt_secret = "integration-secret".to_string();

    let pool = sprout::db::connect(&cfg).await.expect("pool setup failed");
    sprout::db::init_schema(&pool)
        .await
        .expect("schema init failed");

    let state = sprout::router::SproutState::new(&cfg, pool);
    (sprout::router::sprout_router(state), temp_path)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

fn bare_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("failed to build request")
}

async fn read_json(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not json")
}

async fn register(app: &Router, email: &str, password: &str, username: &str) -> StatusCode {
    let body = json!({ "email": email, "password": password, "username": username });
    app.clone()
        .oneshot(json_request("POST", "/register", None, &body))
        .await
        .expect("request failed")
        .status()
}

async fn login_token(app: &Router, email: &str, password: &str) -> String {
    let body = json!({ "email": email, "password": password });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/login", None, &body))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    read_json(resp).await["access_token"]
        .as_str()
        .expect("login response had no token")
        .to_string()
}

#[tokio::test]
async fn register_login_profile_roundtrip() {
    let (app, db_path) = test_app("roundtrip").await;

    assert_eq!(register(&app, "a@x.com", "pw123", "Al").await, StatusCode::CREATED);

    let token = login_token(&app, "a@x.com", "pw123").await;

    let resp = app
        .clone()
        .oneshot(bare_request("GET", "/user/profile", Some(&token)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let profile = read_json(resp).await;
    assert_eq!(profile["email"], "a@x.com");
    assert_eq!(profile["username"], "Al");
    assert_eq!(profile["is_verified"], true);
    // The digest must never appear in a response.
    assert!(profile.get("password_hash").is_none());

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let (app, db_path) = test_app("wrong-pw").await;

    assert_eq!(register(&app, "a@x.com", "pw123", "Al").await, StatusCode::CREATED);

    let body = json!({ "email": "a@x.com", "password": "wrong" });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/login", None, &body))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // An unknown email answers identically.
    let body = json!({ "email": "nobody@x.com", "password": "pw123" });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/login", None, &body))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn register_rejects_missing_or_blank_fields() {
    let (app, db_path) = test_app("register-validation").await;

    let missing_username = json!({ "email": "a@x.com", "password": "pw123" });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/register", None, &missing_username))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let blank_email = json!({ "email": "   ", "password": "pw123", "username": "Al" });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/register", None, &blank_email))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let oversized_password = json!({
        "email": "a@x.com",
        "password": "p".repeat(121),
        "username": "Al",
    });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/register", None, &oversized_password))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn duplicate_email_registration_conflicts() {
    let (app, db_path) = test_app("duplicate").await;

    assert_eq!(register(&app, "a@x.com", "pw123", "Al").await, StatusCode::CREATED);
    assert_eq!(register(&app, "a@x.com", "other", "Alice").await, StatusCode::CONFLICT);

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn concurrent_duplicate_registration_yields_one_winner() {
    let (app, db_path) = test_app("race").await;

    let body = json!({ "email": "race@x.com", "password": "pw123", "username": "R" });
    let (first, second) = tokio::join!(
        app.clone().oneshot(json_request("POST", "/register", None, &body)),
        app.clone().oneshot(json_request("POST", "/register", None, &body)),
    );
    let mut statuses = [
        first.expect("request failed").status(),
        second.expect("request failed").status(),
    ];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn protected_routes_reject_bad_tokens() {
    let (app, db_path) = test_app("bad-tokens").await;

    assert_eq!(register(&app, "a@x.com", "pw123", "Al").await, StatusCode::CREATED);

    // No header at all.
    let resp = app
        .clone()
        .oneshot(bare_request("GET", "/user/profile", None))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Not a token.
    let resp = app
        .clone()
        .oneshot(bare_request("GET", "/user/profile", Some("garbage")))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(resp).await["error"]["code"], "TOKEN_INVALID");

    // Signed with the right secret but already expired.
    let stale_issuer = sprout::auth::TokenIssuer::new("integration-secret", -300);
    let stale = stale_issuer.issue("a@x.com").expect("issue failed");
    let resp = app
        .clone()
        .oneshot(bare_request("GET", "/user/profile", Some(&stale)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(resp).await["error"]["code"], "TOKEN_EXPIRED");

    // Signed with a different secret.
    let foreign_issuer = sprout::auth::TokenIssuer::new("some-other-secret", 3600);
    let foreign = foreign_issuer.issue("a@x.com").expect("issue failed");
    let resp = app
        .clone()
        .oneshot(bare_request("GET", "/user/profile", Some(&foreign)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(resp).await["error"]["code"], "TOKEN_INVALID");

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn password_change_requires_current_password() {
    let (app, db_path) = test_app("pw-change").await;

    assert_eq!(register(&app, "a@x.com", "pw123", "Al").await, StatusCode::CREATED);
    let token = login_token(&app, "a@x.com", "pw123").await;

    let wrong_current = json!({ "current_password": "nope", "new_password": "pw456" });
    let resp = app
        .clone()
        .oneshot(json_request("PUT", "/user/password", Some(&token), &wrong_current))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let change = json!({ "current_password": "pw123", "new_password": "pw456" });
    let resp = app
        .clone()
        .oneshot(json_request("PUT", "/user/password", Some(&token), &change))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // Old credential no longer works; the new one does.
    let body = json!({ "email": "a@x.com", "password": "pw123" });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/login", None, &body))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let _ = login_token(&app, "a@x.com", "pw456").await;

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn account_deletion_cascades_to_owned_content() {
    let (app, db_path) = test_app("delete-account").await;

    assert_eq!(register(&app, "a@x.com", "pw123", "Al").await, StatusCode::CREATED);
    assert_eq!(register(&app, "b@x.com", "pw123", "Bea").await, StatusCode::CREATED);
    let token_a = login_token(&app, "a@x.com", "pw123").await;
    let token_b = login_token(&app, "b@x.com", "pw123").await;

    let post = json!({ "title": "hello", "content": "first post" });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/posts", Some(&token_a), &post))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let post_id = read_json(resp).await["id"].as_i64().expect("no post id");

    // Someone else's comment under the doomed post.
    let comment = json!({ "content": "nice" });
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/posts/{post_id}/comment"),
            Some(&token_b),
            &comment,
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .clone()
        .oneshot(bare_request("DELETE", "/user/delete", Some(&token_a)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // The account is gone...
    let body = json!({ "email": "a@x.com", "password": "pw123" });
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/login", None, &body))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // ...and so is the post, comments included.
    let resp = app
        .clone()
        .oneshot(bare_request("GET", &format!("/posts/{post_id}"), None))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .clone()
        .oneshot(bare_request("GET", "/posts", None))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_json(resp).await, json!([]));

    let _ = fs::remove_file(&db_path);
}
