//! Flashcard set and card endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedAccount;
use crate::AppState;

/// POST /api/sets
pub async fn create_set(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(payload): Json<CreateSetRequest>,
) -> Result<Json<DbFlashcardSet>> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Set name must not be empty".to_string()));
    }

    let set = state
        .db
        .create_set(auth.account_id, &payload.name, payload.description.as_deref())
        .await?;

    Ok(Json(set))
}

/// GET /api/sets
pub async fn list_sets(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
) -> Result<Json<SetListResponse>> {
    let sets = state.db.list_sets(auth.account_id).await?;
    let count = sets.len();
    Ok(Json(SetListResponse { results: sets, count }))
}

/// POST /api/sets/{id}/flashcards
pub async fn create_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(set_id): Path<i64>,
    Json(payload): Json<CreateCardRequest>,
) -> Result<Json<CardSnapshot>> {
    let set = state
        .db
        .get_set(auth.account_id, set_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Flashcard set not found".to_string()))?;

    let difficulty = match payload.difficulty.as_deref() {
        None => Difficulty::default(),
        Some(raw) => Difficulty::from_str(raw)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown difficulty: {raw}")))?,
    };

    let card = state
        .db
        .create_flashcard(set.id, &payload.front, &payload.back, difficulty.as_str())
        .await?;

    Ok(Json(card.to_snapshot()))
}

/// GET /api/sets/{id}/flashcards
///
/// Returns the ordered working set for a session. `due_only=true`
/// restricts to cards whose next review is at or before now;
/// never-reviewed cards are always included.
pub async fn list_cards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(set_id): Path<i64>,
    Query(query): Query<CardListQuery>,
) -> Result<Json<CardListResponse>> {
    let set = state
        .db
        .get_set(auth.account_id, set_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Flashcard set not found".to_string()))?;

    let due_only = query.due_only.unwrap_or(false);
    let cards = state.db.list_flashcards(set.id, due_only, Utc::now()).await?;

    let results: Vec<CardSnapshot> = cards.iter().map(DbFlashcard::to_snapshot).collect();
    let count = results.len();
    Ok(Json(CardListResponse { results, count }))
}
