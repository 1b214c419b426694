//! Authentication middleware

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::AppState;

/// Authenticated account info stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedAccount {
    pub account_id: Uuid,
    pub token: String,
}

/// Auth middleware - extracts account token from Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    // Skip auth for register endpoint and health check
    let path = request.uri().path();
    if path == "/api/account/register" || path == "/health" {
        return Ok(next.run(request).await);
    }

    // Extract Bearer token
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))?
        .to_string();

    // Look up account by token
    let account = state
        .db
        .get_account_by_token(&token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid account token".to_string()))?;

    // Update last_seen
    state.db.update_last_seen(account.id).await?;

    // Store authenticated account in request extensions
    request.extensions_mut().insert(AuthenticatedAccount {
        account_id: account.id,
        token,
    });

    Ok(next.run(request).await)
}
