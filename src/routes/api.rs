use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::profile::{is_valid_profile_id, ProfileDraft, ProfileRecord};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/profiles", get(list_profiles).post(create_profile))
        .route(
            "/api/profiles/{id}",
            get(get_profile).delete(delete_profile),
        )
}

/// `{profiles: [...]}`, newest first.
async fn list_profiles(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let profiles = state.store.list().await?;
    Ok(Json(json!({ "profiles": profiles })))
}

async fn create_profile(
    State(state): State<AppState>,
    Json(draft): Json<ProfileDraft>,
) -> AppResult<Json<Value>> {
    draft.validate()?;
    let record = state.store.save(draft).await?;
    Ok(Json(json!({
        "id": record.id,
        "success": true,
        "profile": record,
    })))
}

async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProfileRecord>> {
    if !is_valid_profile_id(&id) {
        return Err(AppError::NotFound);
    }
    Ok(Json(state.store.get(&id).await?))
}

async fn delete_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    state.store.delete(&id).await?;
    Ok(Json(json!({ "success": true })))
}
