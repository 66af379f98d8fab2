//! Auth Endpoints
//!
//! 요청 역직렬화와 상태 주입만 담당하고 로직은 services::auth에 위임

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::ApiError,
    services::{
        auth::{self, CurrentUserResponse, LoginRequest, LoginResponse, SignupRequest, SignupResponse},
        AuthUser,
    },
    types::OkResponse,
    AppState,
};

/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let response = auth::signup(&state.db, &state.identity, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = auth::login(&state.db, &state.identity, request).await?;
    Ok(Json(response))
}

/// GET /auth/me
pub async fn current_user(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let response = auth::current_user(&state.db, user.user_id).await?;
    Ok(Json(response))
}

/// POST /auth/logout
///
/// 토큰은 stateless라 서버 측 상태가 없음. 클라이언트가 토큰을 폐기하면 됨
pub async fn logout() -> Json<OkResponse> {
    Json(OkResponse::ok())
}
