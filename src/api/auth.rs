use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
    response::IntoResponse,
};

use super::error::{ApiError, ApiResult};
use super::response::success;
use super::AppState;
use crate::external::identity::VerifiedUser;

/// 从 `Authorization: Bearer <token>` 校验得到的用户
#[derive(Debug, Clone)]
pub struct AuthUser(pub VerifiedUser);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let verifier = state.identity.clone().ok_or_else(|| {
            ApiError::ServiceUnavailable("Identity service is not configured".to_string())
        })?;

        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

        let user = verifier.verify(token).await?;
        tracing::debug!(uid = %user.uid, "Verified identity token");
        Ok(AuthUser(user))
    }
}

/// 当前登录用户
pub async fn me(AuthUser(user): AuthUser) -> ApiResult<impl IntoResponse> {
    Ok(success(user))
}
