//! Account registration and status endpoints

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::{AccountRegisterRequest, AccountRegisterResponse, AccountStatusResponse};
use crate::routes::auth::AuthenticatedAccount;
use crate::AppState;

/// POST /api/account/register
/// Creates a new account and returns the token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Option<AccountRegisterRequest>>,
) -> Result<Json<AccountRegisterResponse>> {
    let name = payload.and_then(|p| p.name);
    let account = state.db.create_account(name.as_deref()).await?;

    tracing::info!("Registered new account: {}", account.id);

    Ok(Json(AccountRegisterResponse {
        account_id: account.id,
        token: account.token,
    }))
}

/// GET /api/account/status
/// Returns account status
pub async fn status(
    Extension(auth): Extension<AuthenticatedAccount>,
    State(state): State<AppState>,
) -> Result<Json<AccountStatusResponse>> {
    let account = state
        .db
        .get_account_by_token(&auth.token)
        .await?
        .ok_or_else(|| crate::error::ApiError::NotFound("Account not found".to_string()))?;

    Ok(Json(AccountStatusResponse {
        account_id: account.id,
        last_seen_at: account.last_seen_at,
    }))
}
