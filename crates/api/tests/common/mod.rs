#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use ims_api::config::{MediaConfig, ServerConfig};
use ims_api::router::{build_app_router, App};
use ims_api::state::AppState;
use ims_core::upload::{UploadConfig, DEFAULT_ALLOWED_EXTENSIONS};

/// Upload cap used by the test app: 1 MiB.
pub const TEST_MAX_UPLOAD_BYTES: u64 = 1024 * 1024;

const BOUNDARY: &str = "ims-test-boundary-7MA4YWxkTrZu0gW";

/// Build a test `ServerConfig` with safe defaults and media under `media_root`.
pub fn test_config(media_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        media: MediaConfig {
            root: media_root.to_path_buf(),
            url: "/media/".to_string(),
            serve: true,
        },
        upload: UploadConfig::new(DEFAULT_ALLOWED_EXTENSIONS.iter().copied(), TEST_MAX_UPLOAD_BYTES),
    }
}

/// Build the full application with the production middleware stack.
pub fn build_test_app(pool: PgPool, media_root: &Path) -> App {
    build_app_with_config(pool, test_config(media_root))
}

pub fn build_app_with_config(pool: PgPool, config: ServerConfig) -> App {
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// JSON requests
// ---------------------------------------------------------------------------

pub async fn send(app: App, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: App, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: App, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send_json(app: App, method: Method, uri: &str, json: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: App, uri: &str, json: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, json).await
}

pub async fn put_json(app: App, uri: &str, json: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, json).await
}

pub async fn patch_json(app: App, uri: &str, json: serde_json::Value) -> Response {
    send_json(app, Method::PATCH, uri, json).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

// ---------------------------------------------------------------------------
// Multipart requests
// ---------------------------------------------------------------------------

/// Hand-assembled `multipart/form-data` body.
#[derive(Default)]
pub struct Form {
    body: Vec<u8>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// A complete, valid invoice form for `vendor_id`.
pub fn invoice_form(vendor_id: i64, number: &str, amount: &str, issue_date: &str) -> Form {
    Form::new()
        .text("vendor", &vendor_id.to_string())
        .text("invoice_number", number)
        .text("amount", amount)
        .text("issue_date", issue_date)
        .text("due_date", "2024-12-31")
        .file("file", &format!("{number}.pdf"), b"%PDF-1.4 test document")
}

pub async fn send_form(app: App, method: Method, uri: &str, form: Form) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(form.finish()))
        .unwrap();
    send(app, request).await
}

pub async fn post_form(app: App, uri: &str, form: Form) -> Response {
    send_form(app, Method::POST, uri, form).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a vendor through the API and return its id.
pub async fn create_vendor(app: App, name: &str) -> i64 {
    let response = post_json(
        app,
        "/api/vendors/",
        serde_json::json!({
            "name": name,
            "email": format!("{}@vendors.test", name.to_lowercase()),
            "phone": "(555) 010-0000",
            "address": "1 Market St",
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create an invoice through the API and return its JSON representation.
pub async fn create_invoice(
    app: App,
    vendor_id: i64,
    number: &str,
    amount: &str,
    issue_date: &str,
) -> serde_json::Value {
    let response = post_form(
        app,
        "/api/invoices/",
        invoice_form(vendor_id, number, amount, issue_date),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}
