use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::{
    error::AppError,
    state::user::{AccessToken, CurrentUser},
};

const USER_ID_HEADER: &str = "x-user-id";

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_user(&parts.headers)
    }
}

/// Resolve the caller from `Authorization` (`Bearer <token>` or a bare token) and
/// `X-User-Id`. Both headers are optional; a present but unusable one is rejected.
fn current_user(headers: &HeaderMap) -> Result<CurrentUser, AppError> {
    let token = match headers.get(AUTHORIZATION) {
        Some(value) => {
            let raw = value
                .to_str()
                .map_err(|_| AppError::Unauthorized("malformed authorization header".into()))?
                .trim();
            let token = raw
                .strip_prefix("Bearer ")
                .or_else(|| raw.strip_prefix("bearer "))
                .unwrap_or(raw)
                .trim();
            if token.is_empty() {
                return Err(AppError::Unauthorized("empty bearer token".into()));
            }
            Some(AccessToken::new(token))
        }
        None => None,
    };

    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    Ok(CurrentUser { user_id, token })
}
