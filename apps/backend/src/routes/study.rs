//! Review scheduling endpoint

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedAccount;
use crate::AppState;
use study_core::sm2::Sm2;

/// POST /api/flashcards/{id}/review
///
/// Runs the SM-2 scheduler for one card and persists the result.
pub async fn review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(card_id): Path<i64>,
    Json(payload): Json<SubmitReviewRequest>,
) -> Result<Json<SubmitReviewResponse>> {
    let quality = u8::try_from(payload.quality)
        .ok()
        .and_then(Quality::new)
        .ok_or_else(|| ApiError::BadRequest("Quality must be between 0 and 5".to_string()))?;

    let card = state
        .db
        .get_flashcard(auth.account_id, card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Flashcard not found".to_string()))?;

    let now = Utc::now();
    let update = Sm2::default().review(&card.to_snapshot(), quality, now);
    let updated = state.db.apply_review_update(card.id, &update).await?;

    tracing::debug!(
        card_id,
        quality = quality.value(),
        interval = update.interval_days,
        "review scheduled"
    );

    Ok(Json(SubmitReviewResponse {
        interval: update.interval_days,
        next_review: update.next_review,
        ease_factor: updated.ease_factor,
        review_count: updated.review_count.max(0) as u32,
        correct_count: updated.correct_count.max(0) as u32,
    }))
}
