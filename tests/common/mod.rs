#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use tower::ServiceExt;

use profilemaker::config::Config;
use profilemaker::routes::build_router;
use profilemaker::state::AppState;
use profilemaker::storage::{FileStore, LocalStore, ProfileStore};

pub const BOUNDARY: &str = "profilemaker-test-boundary";

pub fn file_app(dir: &Path) -> (Router, Arc<dyn ProfileStore>) {
    app_with(Arc::new(FileStore::new(dir.to_path_buf())), Config::default())
}

pub fn local_app() -> (Router, Arc<dyn ProfileStore>) {
    app_with(Arc::new(LocalStore::new()), Config::default())
}

/// Local-store app with a small request body limit.
pub fn local_app_with_limit(max_upload_bytes: usize) -> (Router, Arc<dyn ProfileStore>) {
    let mut config = Config::default();
    config.server.max_upload_bytes = max_upload_bytes;
    app_with(Arc::new(LocalStore::new()), config)
}

fn app_with(store: Arc<dyn ProfileStore>, mut config: Config) -> (Router, Arc<dyn ProfileStore>) {
    config.server.public_url = Some("https://intro.example".to_string());
    let state = AppState {
        config,
        store: store.clone(),
    };
    (build_router(state), store)
}

pub async fn send(app: Router, request: Request<Body>) -> (u16, String) {
    let response: Response<Body> = app.oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// `multipart/form-data` POST to the editor with plain text fields.
pub fn editor_form(fields: &[(&str, &str)]) -> Request<Body> {
    editor_request(multipart_fields(fields))
}

/// Editor POST carrying a photo in `profile_image_file` after the text fields.
pub fn editor_upload(fields: &[(&str, &str)], mime: &str, photo: &[u8]) -> Request<Body> {
    let mut body = multipart_fields(fields);
    body.truncate(body.len() - format!("--{BOUNDARY}--\r\n").len());
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"profile_image_file\"; \
             filename=\"photo.png\"\r\nContent-Type: {mime}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(photo);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    editor_request(body)
}

fn multipart_fields(fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body.into_bytes()
}

fn editor_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
