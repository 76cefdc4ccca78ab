use askama::Template;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::markdown;
use crate::profile::{is_valid_profile_id, ProfileDraft};
use crate::routes::home::Html;
use crate::routes::request_origin;
use crate::share::{profile_url, qr_svg, share_title, ShareLinks};
use crate::state::AppState;
use crate::storage::StorageError;

// --- View structs ---

pub struct TopicView {
    pub question: String,
    /// Output of the answer renderer; inserted unescaped.
    pub answer_html: String,
}

/// Everything the profile card template shows.
pub struct ProfileView {
    pub image: String,
    pub name: String,
    pub name_romaji: String,
    pub topics: Vec<TopicView>,
    pub footer_name: String,
}

impl ProfileView {
    pub fn from_draft(draft: &ProfileDraft) -> Self {
        let footer_name = if draft.name_romaji.is_empty() {
            draft.name.clone()
        } else {
            draft.name_romaji.clone()
        };

        Self {
            image: draft.profile_image.clone(),
            name: draft.name.clone(),
            name_romaji: draft.name_romaji.clone(),
            topics: draft
                .visible_topics()
                .map(|topic| TopicView {
                    question: topic.question.clone(),
                    answer_html: markdown::render(&topic.answer),
                })
                .collect(),
            footer_name,
        }
    }
}

pub struct ShareView {
    pub links: ShareLinks,
    pub qr_svg: String,
}

impl ShareView {
    pub fn new(origin: &str, id: &str, name: &str) -> Self {
        let url = profile_url(origin, id);
        let qr_svg = qr_svg(&url).unwrap_or_else(|e| {
            tracing::warn!("QR code generation failed for {}: {}", url, e);
            String::new()
        });

        Self {
            links: ShareLinks::new(&url, &share_title(name)),
            qr_svg,
        }
    }
}

// --- Templates ---

#[derive(Template)]
#[template(path = "pages/profile.html")]
pub struct ProfileTemplate {
    pub profile: ProfileView,
    pub share: ShareView,
}

#[derive(Template)]
#[template(path = "pages/error.html")]
pub struct ErrorPageTemplate {
    pub title: String,
    pub message: String,
}

impl ErrorPageTemplate {
    pub fn not_found() -> Self {
        Self {
            title: "プロフィールが見つかりません".to_string(),
            message: "指定されたプロフィールは存在しないか、削除された可能性があります。"
                .to_string(),
        }
    }
}

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(show_profile))
}

// --- Handlers ---

/// One store read per page load; failures are not retried.
async fn show_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !is_valid_profile_id(&id) {
        return (StatusCode::NOT_FOUND, Html(ErrorPageTemplate::not_found())).into_response();
    }

    match state.store.get(&id).await {
        Ok(record) => {
            let origin = request_origin(&state.config, &headers);
            Html(ProfileTemplate {
                profile: ProfileView::from_draft(&record.draft),
                share: ShareView::new(&origin, &record.id, &record.draft.name),
            })
            .into_response()
        }
        Err(StorageError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, Html(ErrorPageTemplate::not_found())).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to load profile {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(ErrorPageTemplate {
                    title: "読み込みに失敗しました".to_string(),
                    message: "時間をおいてもう一度お試しください。".to_string(),
                }),
            )
                .into_response()
        }
    }
}
