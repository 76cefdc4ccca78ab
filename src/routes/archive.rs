use askama::Template;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};

use crate::profile::ProfileSummary;
use crate::routes::home::Html;
use crate::routes::request_origin;
use crate::routes::viewer::ErrorPageTemplate;
use crate::share::profile_url;
use crate::state::AppState;
use crate::storage::StorageError;

pub struct ArchiveEntry {
    pub id: String,
    pub name: String,
    pub name_romaji: String,
    pub created_at: String,
    pub updated_at: String,
    pub url: String,
}

impl ArchiveEntry {
    fn new(summary: ProfileSummary, origin: &str) -> Self {
        Self {
            url: profile_url(origin, &summary.id),
            created_at: format_timestamp(&summary.created_at),
            updated_at: format_timestamp(&summary.updated_at),
            id: summary.id,
            name: summary.name,
            name_romaji: summary.name_romaji,
        }
    }
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y/%m/%d %H:%M").to_string()
}

#[derive(Template)]
#[template(path = "pages/archive.html")]
pub struct ArchiveTemplate {
    pub entries: Vec<ArchiveEntry>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/archive", get(archive_page))
        .route("/archive/{id}/delete", post(delete_profile))
}

async fn archive_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state.store.list().await {
        Ok(summaries) => {
            let origin = request_origin(&state.config, &headers);
            let entries = summaries
                .into_iter()
                .map(|summary| ArchiveEntry::new(summary, &origin))
                .collect();
            Html(ArchiveTemplate { entries }).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to list profiles: {}", e);
            failure_page("一覧を読み込めませんでした")
        }
    }
}

async fn delete_profile(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store.delete(&id).await {
        Ok(()) => Redirect::to("/archive").into_response(),
        Err(StorageError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, Html(ErrorPageTemplate::not_found())).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to delete profile {}: {}", id, e);
            failure_page("削除に失敗しました")
        }
    }
}

fn failure_page(title: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(ErrorPageTemplate {
            title: title.to_string(),
            message: "時間をおいてもう一度お試しください。".to_string(),
        }),
    )
        .into_response()
}
