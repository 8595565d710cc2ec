//! End-to-end flows through the full router

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use inkwell::auth::password::MIN_COST;
use inkwell::core::config::{Config, ServerConfig};
use inkwell::db::{MemoryBlogStore, MemoryUserStore, UserStore};
use inkwell::{ApiServer, AppState, AuthService, ManualClock, PasswordHasher, TokenService};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

const SECRET: &str = "integration-secret-key-of-32-bytes-plus";

fn server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout: 30,
        allowed_origins: vec!["*".to_string()],
    }
}

fn memory_app() -> (Router, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_700_000_000));
    let tokens = Arc::new(TokenService::new(SECRET, clock.clone()));
    let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
    let auth = AuthService::new(
        users.clone(),
        PasswordHasher::new(MIN_COST),
        tokens.clone(),
        Duration::from_secs(3600),
    )
    .unwrap();

    let state = AppState {
        auth: Arc::new(auth),
        tokens,
        users,
        blogs: Arc::new(MemoryBlogStore::new()),
        clock: clock.clone(),
    };

    (ApiServer::new(server_config(), state).into_router(), clock)
}

struct Reply {
    status: StatusCode,
    trace_id: Option<String>,
    body: Vec<u8>,
}

impl Reply {
    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }

    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
    token: Option<&str>,
) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let trace_id = response
        .headers()
        .get("X-Trace-Id")
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    Reply {
        status,
        trace_id,
        body,
    }
}

async fn login_token(app: &Router, username: &str, password: &str) -> String {
    let body = json!({ "username": username, "password": password }).to_string();
    let reply = send(app, Method::POST, "/login", Some(&body), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    reply.json()["access-token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_login_protected_scenario() {
    let (app, clock) = memory_app();
    let alice = r#"{"username":"alice","password":"s3cret"}"#;

    let reply = send(&app, Method::POST, "/register", Some(alice), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.text(), "Successfully Registered");

    let reply = send(&app, Method::POST, "/register", Some(alice), None).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.json()["message"], "User already exists");

    let token = login_token(&app, "alice", "s3cret").await;
    assert!(!token.is_empty());

    let reply = send(&app, Method::GET, "/protected", None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.text(), "This is a protected path");

    let reply = send(&app, Method::GET, "/protected", None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    clock.advance(Duration::from_secs(3601));
    let reply = send(&app, Method::GET, "/protected", None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.json()["message"], "Unauthorized");
}

#[tokio::test]
async fn test_bad_login_shapes_are_identical() {
    let (app, _) = memory_app();
    send(
        &app,
        Method::POST,
        "/register",
        Some(r#"{"username":"alice","password":"s3cret"}"#),
        None,
    )
    .await;

    let wrong_password = send(
        &app,
        Method::POST,
        "/login",
        Some(r#"{"username":"alice","password":"nope"}"#),
        None,
    )
    .await;
    let unknown_user = send(
        &app,
        Method::POST,
        "/login",
        Some(r#"{"username":"mallory","password":"s3cret"}"#),
        None,
    )
    .await;

    assert_eq!(wrong_password.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password.status, unknown_user.status);

    let (a, b) = (wrong_password.json(), unknown_user.json());
    assert_eq!(a["error"], b["error"]);
    assert_eq!(a["message"], "Invalid user credentials");
    assert_eq!(a["message"], b["message"]);
}

#[tokio::test]
async fn test_register_rejects_bad_bodies() {
    let (app, _) = memory_app();

    let reply = send(&app, Method::POST, "/register", Some("{oops"), None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["message"], "Invalid Request");

    let reply = send(
        &app,
        Method::POST,
        "/register",
        Some(r#"{"username":"alice","password":""}"#),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["message"], "Invalid Request - fields empty");

    let too_long = json!({ "username": "alice", "password": "a".repeat(73) }).to_string();
    let reply = send(&app, Method::POST, "/register", Some(&too_long), None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["message"], "Invalid Request - password too long");
}

#[tokio::test]
async fn test_error_trace_id_matches_header() {
    let (app, _) = memory_app();
    let reply = send(&app, Method::GET, "/nowhere", None, None).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    let header = reply.trace_id.clone().unwrap();
    assert_eq!(reply.json()["trace_id"], header.as_str());
}

#[tokio::test]
async fn test_blog_crud() {
    let (app, clock) = memory_app();
    send(
        &app,
        Method::POST,
        "/register",
        Some(r#"{"username":"alice","password":"s3cret"}"#),
        None,
    )
    .await;
    let token = login_token(&app, "alice", "s3cret").await;

    let draft = json!({
        "title": "Hello, World!",
        "description": "first post",
        "content": "body text",
    })
    .to_string();

    // Writing requires a token
    let reply = send(&app, Method::POST, "/blog", Some(&draft), None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = send(&app, Method::POST, "/blog", Some(&draft), Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    let created = reply.json();
    assert_eq!(created["slug"], "hello-world");
    assert_eq!(created["author"], "alice");

    let reply = send(&app, Method::POST, "/blog", Some(&draft), Some(&token)).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.json()["message"], "Blog already exists");

    let reply = send(
        &app,
        Method::POST,
        "/blog",
        Some(r#"{"title":"?!?"}"#),
        Some(&token),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    // Reads are public
    let reply = send(&app, Method::GET, "/blog/hello-world", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["content"], "body text");

    let reply = send(
        &app,
        Method::PUT,
        "/blog/hello-world",
        Some(r#"{"title":"Renamed","content":"edited"}"#),
        Some(&token),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let updated = reply.json();
    assert_eq!(updated["slug"], "hello-world");
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["description"], "first post");
    assert_eq!(updated["content"], "edited");

    let reply = send(&app, Method::PUT, "/blog/missing", Some("{}"), Some(&token)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    clock.advance(Duration::from_secs(10));
    let second = json!({ "title": "Second post" }).to_string();
    let reply = send(&app, Method::POST, "/blog", Some(&second), Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(&app, Method::GET, "/blogs", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    let slugs: Vec<String> = reply
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["slug"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(slugs, vec!["second-post", "hello-world"]);

    let reply = send(&app, Method::DELETE, "/blog/hello-world", None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = send(&app, Method::DELETE, "/blog/hello-world", None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.text(), "Blog deleted");

    let reply = send(&app, Method::GET, "/blog/hello-world", None, None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = send(&app, Method::DELETE, "/blog/hello-world", None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sqlite_backend_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("inkwell.db");

    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        file,
        r#"
[store]
backend = "sqlite"
path = "{}"

[auth]
jwt_secret = "{}"
bcrypt_cost = 4
"#,
        db_path.display().to_string().replace('\\', "/"),
        SECRET
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    let clock = Arc::new(ManualClock::starting_now());
    let state = AppState::from_config(&config, clock).unwrap();
    let app = ApiServer::new(config.server.clone(), state).into_router();

    let alice = r#"{"username":"alice","password":"s3cret"}"#;
    let reply = send(&app, Method::POST, "/register", Some(alice), None).await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(&app, Method::POST, "/register", Some(alice), None).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);

    let token = login_token(&app, "alice", "s3cret").await;
    let reply = send(&app, Method::GET, "/protected", None, Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(db_path.exists());
}
