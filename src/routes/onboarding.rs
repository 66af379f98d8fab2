//! Onboarding / Profile Endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::ApiError,
    services::{
        onboarding::{
            self, AdvertiserProfileRequest, AdvertiserProfileResponse, InfluencerProfileDetail,
            InfluencerProfileRequest, InfluencerProfileResponse,
        },
        AuthUser,
    },
    AppState,
};

/// POST /advertiser/profile
pub async fn create_advertiser_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<AdvertiserProfileRequest>,
) -> Result<(StatusCode, Json<AdvertiserProfileResponse>), ApiError> {
    let response = onboarding::create_advertiser_profile(&state.db, user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /influencer/profile
pub async fn create_influencer_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<InfluencerProfileRequest>,
) -> Result<(StatusCode, Json<InfluencerProfileResponse>), ApiError> {
    let response = onboarding::create_influencer_profile(&state.db, user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /influencer/profile
pub async fn get_influencer_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<InfluencerProfileDetail>, ApiError> {
    let response = onboarding::get_influencer_profile(&state.db, user.user_id).await?;
    Ok(Json(response))
}

/// PATCH /influencer/profile (프로필 필드 + 채널 셋 전체 교체)
pub async fn update_influencer_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<InfluencerProfileRequest>,
) -> Result<Json<InfluencerProfileResponse>, ApiError> {
    let response = onboarding::update_influencer_profile(&state.db, user.user_id, request).await?;
    Ok(Json(response))
}
