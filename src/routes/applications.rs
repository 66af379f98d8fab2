//! Application Endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    services::{
        applications::{
            self, ApplicantListResponse, ApplicationCreateRequest, ApplicationCreateResponse,
            ApplicationListQuery, DecisionRequest, MyApplicationListResponse,
        },
        AuthUser,
    },
    types::OkResponse,
    AppState,
};

/// POST /campaigns/:id/applications
pub async fn submit_application(
    State(state): State<AppState>,
    user: AuthUser,
    Path(campaign_id): Path<Uuid>,
    Json(request): Json<ApplicationCreateRequest>,
) -> Result<(StatusCode, Json<ApplicationCreateResponse>), ApiError> {
    let response =
        applications::submit_application(&state.db, user.user_id, campaign_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /my/applications
pub async fn list_my_applications(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ApplicationListQuery>,
) -> Result<Json<MyApplicationListResponse>, ApiError> {
    let response = applications::get_my_applications(&state.db, user.user_id, query).await?;
    Ok(Json(response))
}

/// GET /campaigns/:id/applicants
pub async fn list_campaign_applicants(
    State(state): State<AppState>,
    user: AuthUser,
    Path(campaign_id): Path<Uuid>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<Json<ApplicantListResponse>, ApiError> {
    let response =
        applications::get_campaign_applicants(&state.db, user.user_id, campaign_id, query).await?;
    Ok(Json(response))
}

/// PATCH /applications/:id/status
pub async fn decide_application(
    State(state): State<AppState>,
    user: AuthUser,
    Path(application_id): Path<Uuid>,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let response =
        applications::decide_application(&state.db, user.user_id, application_id, request).await?;
    Ok(Json(response))
}
