//! Campaign Endpoints
//!
//! 공개 목록/상세는 인증 없이, 생성/수정/삭제/모집 종료는 소유 광고주만

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    services::{
        campaigns::{
            self, AdvertiserCampaignListResponse, AdvertiserCampaignQuery, CampaignCreateRequest,
            CampaignCreateResponse, CampaignDetail, CampaignListQuery, CampaignListResponse,
            CampaignUpdateRequest,
        },
        AuthUser,
    },
    types::OkResponse,
    AppState,
};

/// GET /campaigns
pub async fn list_campaigns(
    State(state): State<AppState>,
    Query(query): Query<CampaignListQuery>,
) -> Result<Json<CampaignListResponse>, ApiError> {
    let response = campaigns::get_campaigns(&state.db, query).await?;
    Ok(Json(response))
}

/// GET /campaigns/:id
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<CampaignDetail>, ApiError> {
    let response = campaigns::get_campaign_by_id(&state.db, campaign_id).await?;
    Ok(Json(response))
}

/// POST /campaigns
pub async fn create_campaign(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CampaignCreateRequest>,
) -> Result<(StatusCode, Json<CampaignCreateResponse>), ApiError> {
    let response = campaigns::create_campaign(&state.db, user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /my/campaigns
pub async fn list_advertiser_campaigns(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AdvertiserCampaignQuery>,
) -> Result<Json<AdvertiserCampaignListResponse>, ApiError> {
    let response = campaigns::get_advertiser_campaigns(&state.db, user.user_id, query).await?;
    Ok(Json(response))
}

/// PATCH /campaigns/:id
pub async fn update_campaign(
    State(state): State<AppState>,
    user: AuthUser,
    Path(campaign_id): Path<Uuid>,
    Json(request): Json<CampaignUpdateRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let response =
        campaigns::update_campaign(&state.db, user.user_id, campaign_id, request).await?;
    Ok(Json(response))
}

/// DELETE /campaigns/:id
pub async fn delete_campaign(
    State(state): State<AppState>,
    user: AuthUser,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<OkResponse>, ApiError> {
    let response = campaigns::delete_campaign(&state.db, user.user_id, campaign_id).await?;
    Ok(Json(response))
}

/// POST /campaigns/:id/close
pub async fn close_recruitment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<OkResponse>, ApiError> {
    let response = campaigns::close_recruitment(&state.db, user.user_id, campaign_id).await?;
    Ok(Json(response))
}
