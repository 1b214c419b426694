//! Study session endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedAccount;
use crate::AppState;

/// POST /api/sessions
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<SessionRecord>> {
    let set = state
        .db
        .get_set(auth.account_id, payload.flashcard_set_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Flashcard set not found".to_string()))?;

    let session = state
        .db
        .create_session(auth.account_id, set.id, payload.mode)
        .await?;

    tracing::info!(
        session_id = session.id,
        set_id = set.id,
        mode = payload.mode.as_str(),
        "study session started"
    );

    Ok(Json(session.to_record()))
}

/// PATCH /api/sessions/{id}
///
/// Persists updated counters. Counters only move forward and an ended
/// session is immutable.
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(session_id): Path<i64>,
    Json(payload): Json<UpdateSessionRequest>,
) -> Result<Json<SessionRecord>> {
    let session = state
        .db
        .get_session(auth.account_id, session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Study session not found".to_string()))?;

    if session.ended_at.is_some() {
        return Err(ApiError::Conflict("Session already ended".to_string()));
    }
    if payload.cards_correct > payload.cards_studied {
        return Err(ApiError::BadRequest(
            "cards_correct cannot exceed cards_studied".to_string(),
        ));
    }
    if (payload.cards_studied as i32) < session.cards_studied
        || (payload.cards_correct as i32) < session.cards_correct
    {
        return Err(ApiError::BadRequest(
            "Session counters cannot decrease".to_string(),
        ));
    }

    let updated = state
        .db
        .update_session_counters(session_id, payload.cards_studied, payload.cards_correct)
        .await?;

    Ok(Json(updated.to_record()))
}

/// POST /api/sessions/{id}/end
pub async fn end(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(session_id): Path<i64>,
) -> Result<Json<SessionRecord>> {
    let session = state
        .db
        .get_session(auth.account_id, session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Study session not found".to_string()))?;

    let ended = state.db.end_session(session.id).await?;

    tracing::info!(session_id = ended.id, "study session ended");

    Ok(Json(ended.to_record()))
}

/// GET /api/sessions/{id}/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(session_id): Path<i64>,
) -> Result<Json<SessionStats>> {
    let session = state
        .db
        .get_session(auth.account_id, session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Study session not found".to_string()))?;

    Ok(Json(session.to_stats()))
}
