use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::jwt::{self, AuthenticatedUser},
};

/// The caller behind the `Authorization: Bearer` header.
pub struct CurrentUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        get_current_user(state, &parts.headers).map(CurrentUser)
    }
}

pub fn get_current_user(app_state: &AppState, headers: &HeaderMap) -> AppResult<AuthenticatedUser> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;
    jwt::authenticate(token, &app_state.config.jwt_secret)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
