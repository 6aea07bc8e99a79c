use crate::auth::jwt::JwtService;
use crate::auth::models::{AuthUser, JwtClaims};
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tubely_core::AppError;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtService,
}

fn authenticate(headers: &HeaderMap, jwt: &JwtService) -> Result<JwtClaims, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    jwt.validate_token(token.trim())
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = match authenticate(request.headers(), &auth_state.jwt) {
        Ok(claims) => claims,
        Err(e) => return HttpAppError(e).into_response(),
    };

    request
        .extensions_mut()
        .insert(AuthUser { user_id: claims.sub });
    next.run(request).await
}
