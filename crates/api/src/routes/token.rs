use axum::{
    extract::{Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::cookie::{build_clear_cookie, build_refresh_cookie, extract_refresh_token};
use crate::auth::refresh;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

fn refresh_token_from(req: &Request) -> Option<String> {
    req.headers()
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_refresh_token)
}

fn with_cookie(mut response: Response, cookie: String) -> Result<Response, AppError> {
    let value = HeaderValue::from_str(&cookie)
        .map_err(|_| AppError::Internal("Failed to build cookie header".to_string()))?;
    response.headers_mut().insert(SET_COOKIE, value);
    Ok(response)
}

/// Rotate the refresh cookie and hand back a fresh access token.
pub async fn refresh_handler(
    State(state): State<AppState>,
    req: Request,
) -> Result<Response, AppError> {
    let raw_token = refresh_token_from(&req)
        .ok_or_else(|| AppError::Unauthorized("No refresh token in cookie".to_string()))?;

    let auth_config = state.auth_config();
    let result = refresh::rotate_refresh_token(
        &state.db,
        &raw_token,
        auth_config.refresh_token_expiration_days,
    )
    .await?;

    let user_row = infra::repos::users::get_by_id(&state.db, result.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    let token = state
        .jwt_service()
        .create_token(result.user_id, user_row.email)?;

    let cookie = build_refresh_cookie(
        &result.new_raw_token,
        auth_config.refresh_max_age_secs(),
        &auth_config.cookie_domain,
        auth_config.cookie_secure,
    );

    with_cookie(Json(RefreshResponse { token }).into_response(), cookie)
}

/// Sign out: revoke the refresh token family (if any) and clear the cookie.
pub async fn logout_handler(
    State(state): State<AppState>,
    req: Request,
) -> Result<Response, AppError> {
    if let Some(raw_token) = refresh_token_from(&req) {
        if let Err(e) = refresh::revoke_by_token(&state.db, &raw_token).await {
            tracing::warn!("Failed to revoke refresh token on logout: {e}");
        }
    }

    let auth_config = state.auth_config();
    let cookie = build_clear_cookie(&auth_config.cookie_domain, auth_config.cookie_secure);

    with_cookie(StatusCode::NO_CONTENT.into_response(), cookie)
}
