use askama::Template;
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::collections::HashSet;

use crate::error::{AppError, AppResult};
use crate::profile::{
    EditorAction, EditorStep, ProfileDraft, Topic, TopicField, ValidationError, MAX_TOPICS,
    MIN_TOPICS,
};
use crate::routes::request_origin;
use crate::routes::viewer::{ProfileView, ShareView};
use crate::state::AppState;

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

// --- Templates ---

#[derive(Template)]
#[template(path = "pages/editor.html")]
pub struct EditorTemplate {
    pub draft: ProfileDraft,
    pub error: Option<String>,
    pub preview: Option<ProfileView>,
    pub can_add_topic: bool,
    pub can_remove_topic: bool,
    pub can_publish: bool,
}

impl EditorTemplate {
    fn new(draft: ProfileDraft, error: Option<String>, preview: Option<ProfileView>) -> Self {
        Self {
            can_add_topic: draft.topics.len() < MAX_TOPICS,
            can_remove_topic: draft.topics.len() > MIN_TOPICS,
            can_publish: draft.can_publish(),
            draft,
            error,
            preview,
        }
    }
}

#[derive(Template)]
#[template(path = "pages/published.html")]
pub struct PublishedTemplate {
    pub id: String,
    pub profile: ProfileView,
    pub share: ShareView,
}

/// Room left under the body limit for names, topics and multipart framing
/// once the embedded photo is counted.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Largest data URL the editor keeps, so the form it round-trips stays under
/// the request body limit.
fn image_budget(max_upload_bytes: usize) -> usize {
    max_upload_bytes.saturating_sub(FORM_OVERHEAD_BYTES)
}

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(editor).post(submit))
}

// --- Handlers ---

async fn editor() -> Html<EditorTemplate> {
    Html(EditorTemplate::new(ProfileDraft::new(), None, None))
}

async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> AppResult<Response> {
    let budget = image_budget(state.config.server.max_upload_bytes);
    let (mut draft, action, upload_error) = read_submission(multipart, budget).await?;

    if let Some(err) = upload_error {
        let page = EditorTemplate::new(draft, Some(editor_message(&err).to_string()), None);
        return Ok((StatusCode::BAD_REQUEST, Html(page)).into_response());
    }

    match draft.apply(action) {
        Ok(EditorStep::Editing) => Ok(Html(EditorTemplate::new(draft, None, None)).into_response()),
        Ok(EditorStep::Previewing) => {
            let preview = ProfileView::from_draft(&draft);
            Ok(Html(EditorTemplate::new(draft, None, Some(preview))).into_response())
        }
        Ok(EditorStep::ReadyToPublish) => match state.store.save(draft.clone()).await {
            Ok(record) => {
                let origin = request_origin(&state.config, &headers);
                Ok(Html(PublishedTemplate {
                    profile: ProfileView::from_draft(&record.draft),
                    share: ShareView::new(&origin, &record.id, &record.draft.name),
                    id: record.id,
                })
                .into_response())
            }
            Err(e) => {
                tracing::error!("Failed to publish profile: {}", e);
                let message = "保存に失敗しました。もう一度お試しください。".to_string();
                let page = EditorTemplate::new(draft, Some(message), None);
                Ok((StatusCode::INTERNAL_SERVER_ERROR, Html(page)).into_response())
            }
        },
        Err(err) => {
            let page = EditorTemplate::new(draft, Some(editor_message(&err).to_string()), None);
            Ok((StatusCode::BAD_REQUEST, Html(page)).into_response())
        }
    }
}

/// Rebuild the draft from the editor form.
///
/// Topics arrive as parallel `topic_id` / `topic_question` / `topic_answer`
/// fields in form order. A rejected upload is reported separately so the
/// rest of the form survives.
async fn read_submission(
    mut multipart: Multipart,
    image_budget: usize,
) -> AppResult<(ProfileDraft, EditorAction, Option<ValidationError>)> {
    let mut draft = ProfileDraft::default();
    let mut topic_ids = Vec::new();
    let mut questions = Vec::new();
    let mut answers = Vec::new();
    let mut action = String::new();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "profile_image_file" {
            let mime = field.content_type().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if !bytes.is_empty() {
                upload = Some((mime, bytes));
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        match name.as_str() {
            "profile_image" => draft.profile_image = value,
            "name" => draft.name = value,
            "name_romaji" => draft.name_romaji = value,
            "topic_id" => topic_ids.push(value),
            "topic_question" => questions.push(value),
            "topic_answer" => answers.push(value),
            "action" => action = value,
            _ => {}
        }
    }

    if topic_ids.len() != questions.len() || topic_ids.len() != answers.len() {
        return Err(AppError::BadRequest(format!(
            "Mismatched topic fields: {} ids, {} questions, {} answers",
            topic_ids.len(),
            questions.len(),
            answers.len()
        )));
    }

    let mut seen = HashSet::new();
    for ((id, question), answer) in topic_ids.into_iter().zip(questions).zip(answers) {
        if !seen.insert(id.clone()) {
            return Err(AppError::BadRequest(format!("Duplicate topic id: {}", id)));
        }
        draft.topics.push(Topic {
            id: id.clone(),
            question: String::new(),
            answer: String::new(),
        });
        draft.update_topic(&id, TopicField::Question, &question);
        draft.update_topic(&id, TopicField::Answer, &answer);
    }

    let upload_error = match upload {
        Some((mime, bytes)) => draft.set_image(&mime, &bytes, image_budget).err(),
        None => None,
    };

    let action = action.parse::<EditorAction>().map_err(AppError::BadRequest)?;
    Ok((draft, action, upload_error))
}

fn editor_message(err: &ValidationError) -> &'static str {
    match err {
        ValidationError::MissingName => "名前を入力してください。",
        ValidationError::MissingNameRomaji => "名前（ローマ字）を入力してください。",
        ValidationError::TooManyTopics { .. } => "お題は5つまでです。",
        ValidationError::InvalidImage => "画像ファイルを選択してください。",
        ValidationError::ImageTooLarge { .. } => {
            "画像のサイズが大きすぎます。小さい画像を選択してください。"
        }
    }
}
