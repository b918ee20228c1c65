//! In-process stand-in for the document-chat backend.

#![allow(dead_code)]

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use documind::config::Config;

pub const VALID_EMAIL: &str = "test@example.com";
pub const VALID_PASSWORD: &str = "securepassword";
pub const ISSUED_TOKEN: &str = "tok-1";
pub const MAX_FILES: usize = 2;

#[derive(Clone, Default)]
pub struct Backend {
    pub files: Arc<Mutex<Vec<String>>>,
}

impl Backend {
    pub fn with_files(files: &[&str]) -> Self {
        let backend = Self::default();
        *backend.files.lock().unwrap() = files.iter().map(|f| f.to_string()).collect();
        backend
    }

    /// Serve on an ephemeral port and return the base URL.
    pub async fn spawn(self) -> String {
        let router = Router::new()
            .route("/", get(root))
            .route("/token", post(token))
            .route("/register", post(register))
            .route("/files", get(files))
            .route("/upload", post(upload))
            .route("/chat", post(chat))
            .with_state(self);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }
}

/// A base URL nothing listens on.
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn config(base_url: &str, dir: &tempfile::TempDir) -> Config {
    Config {
        base_url: base_url.to_string(),
        token_path: dir.path().join("token.json"),
        request_timeout: Some(Duration::from_secs(5)),
        verbose: false,
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {}", ISSUED_TOKEN).as_str())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Could not validate credentials" })),
    )
        .into_response()
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "DocuMind Pro API is running" }))
}

async fn token(Json(body): Json<Value>) -> Response {
    if body["email"] == VALID_EMAIL && body["password"] == VALID_PASSWORD {
        Json(json!({ "access_token": ISSUED_TOKEN, "token_type": "bearer" })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Incorrect username or password" })),
        )
            .into_response()
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == VALID_EMAIL {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Email already registered" })),
        )
            .into_response();
    }
    Json(json!({ "id": 7, "email": body["email"] })).into_response()
}

async fn files(State(state): State<Backend>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let files = state.files.lock().unwrap().clone();
    Json(json!({ "files": files })).into_response()
}

async fn upload(
    State(state): State<Backend>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("unnamed").to_string();
        let bytes = field.bytes().await.unwrap_or_default();

        let mut files = state.files.lock().unwrap();
        if files.len() >= MAX_FILES {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": "File limit exceeded (Max 2 files)." })),
            )
                .into_response();
        }
        files.push(filename.clone());

        return Json(json!({
            "filename": filename,
            "status": "success",
            "chunks_processed": bytes.len(),
            "total_files": files.len(),
        }))
        .into_response();
    }

    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "detail": [{ "loc": ["body", "file"], "msg": "field required" }] })),
    )
        .into_response()
}

async fn chat(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let question = body["question"].as_str().unwrap_or_default();
    if question == "explode" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    }
    Json(json!({ "answer": format!("Answer: echo {}\nSources: doc.pdf p.1", question) }))
        .into_response()
}
