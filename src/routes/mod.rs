pub mod api;
pub mod archive;
pub mod assets;
pub mod home;
pub mod viewer;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderMap};
use axum::routing::get;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::AppState;

/// Assemble every page, API route and layer.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .merge(home::router())
        .merge(archive::router())
        .merge(api::router())
        .route("/assets/{*path}", get(assets::serve))
        .merge(viewer::router())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Origin that shareable URLs are built on.
///
/// The configured `public_url` wins; otherwise the request's Host header
/// (and `X-Forwarded-Proto` behind a proxy).
pub fn request_origin(config: &Config, headers: &HeaderMap) -> String {
    if let Some(ref url) = config.server.public_url {
        return url.clone();
    }

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");

    format!("{}://{}", scheme, host)
}
