//! Application Service
//!
//! 지원서 제출 파이프라인과 선정/거절 워크플로.
//!
//! # Admission Pipeline
//!
//! 제출은 고정된 순서의 게이트를 통과해야 함:
//!
//! 1. 캠페인 존재 (404)
//! 2. 모집 중 + 마감일 미경과 (CAMPAIGN_CLOSED)
//! 3. 중복 지원 없음 (DUPLICATE_APPLICATION)
//! 4. 정원 미달 (CAMPAIGN_CLOSED, 409)
//! 5. 방문 희망일이 [오늘, 마감일] 안 (INVALID_VISIT_DATE)
//!
//! 3/4의 동시성 구멍은 부분 UNIQUE 인덱스와 조건부 insert가 막음.
//! 선정/거절은 모집 종료(in_progress 이후) 상태에서만 허용됨.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::{is_unique_violation, Database, APPLICATION_UNIQUE_CONSTRAINT},
    error::ApiError,
    types::{
        has_more, normalize_limit, normalize_offset, ApplicationStatus, CampaignStatus,
        OkResponse, SnsChannel,
    },
};

/// 지원 동기 길이 제한 (자 수 기준)
const MESSAGE_MIN_CHARS: usize = 10;
const MESSAGE_MAX_CHARS: usize = 500;
/// 프로필을 찾지 못한 경우의 표시 이름
const UNKNOWN_NAME: &str = "알 수 없음";

// ============ Request/Response Types ============

#[derive(Debug, Deserialize)]
pub struct ApplicationCreateRequest {
    pub message: String,
    pub visit_date: NaiveDate,
    pub selected_sns_channel: SnsChannel,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationCreateResponse {
    pub application_id: Uuid,
    pub campaign_id: Uuid,
    pub status: ApplicationStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApplicationListQuery {
    pub status: Option<ApplicationStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// 인플루언서 본인의 지원 내역 한 건
#[derive(Debug, Serialize)]
pub struct MyApplicationItem {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub message: String,
    pub visit_date: NaiveDate,
    pub selected_sns_channel: SnsChannel,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub campaign_title: String,
    pub campaign_thumbnail: Option<String>,
    pub campaign_category: String,
    pub campaign_start_date: NaiveDate,
    pub campaign_end_date: NaiveDate,
    /// 지원 이후 캠페인이 소프트 삭제됐는지 표시 (지원 이력은 유지)
    pub campaign_deleted: bool,
    pub business_name: String,
}

#[derive(Debug, Serialize)]
pub struct MyApplicationListResponse {
    pub applications: Vec<MyApplicationItem>,
    pub total: i64,
    pub has_more: bool,
}

/// 광고주가 보는 지원자 한 건
#[derive(Debug, Serialize)]
pub struct ApplicantItem {
    pub id: Uuid,
    pub influencer_id: Uuid,
    pub influencer_name: String,
    pub message: String,
    pub visit_date: NaiveDate,
    pub selected_sns_channel: SnsChannel,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApplicantListResponse {
    pub applicants: Vec<ApplicantItem>,
    pub total: i64,
    pub has_more: bool,
}

/// 선정/거절 요청 (pending 복귀는 불허)
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Selected,
    Rejected,
}

impl DecisionStatus {
    fn as_str(self) -> &'static str {
        match self {
            DecisionStatus::Selected => "selected",
            DecisionStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub status: DecisionStatus,
}

// ============ Gates ============

/// 모집 상태 게이트: recruiting이 아니거나 마감일이 지났으면 닫힘
fn check_campaign_open(
    status: CampaignStatus,
    end_date: NaiveDate,
    today: NaiveDate,
) -> Result<(), ApiError> {
    if status != CampaignStatus::Recruiting || end_date < today {
        return Err(ApiError::CampaignClosed);
    }
    Ok(())
}

/// 중복 지원 게이트: 같은 캠페인에 살아있는 지원서는 한 건만
fn check_no_duplicate(already_applied: bool) -> Result<(), ApiError> {
    if already_applied {
        return Err(ApiError::DuplicateApplication);
    }
    Ok(())
}

/// 정원 게이트 (제출 시점 스냅샷 — 최종 판정은 조건부 insert가 담당)
fn check_capacity(current_applicants: i64, total_recruits: i32) -> Result<(), ApiError> {
    if current_applicants >= total_recruits as i64 {
        return Err(ApiError::CampaignFull);
    }
    Ok(())
}

/// 방문 희망일 게이트: [오늘, 모집 마감일] 양끝 포함
fn check_visit_date(
    visit_date: NaiveDate,
    today: NaiveDate,
    end_date: NaiveDate,
) -> Result<(), ApiError> {
    if visit_date < today || visit_date > end_date {
        return Err(ApiError::InvalidVisitDate);
    }
    Ok(())
}

/// 선정/거절 게이트: 소유 광고주 + 모집이 이미 종료된 캠페인만
fn decision_gate(
    campaign_advertiser: Uuid,
    caller: Uuid,
    campaign_status: CampaignStatus,
) -> Result<(), ApiError> {
    if campaign_advertiser != caller {
        return Err(ApiError::Forbidden);
    }
    if campaign_status == CampaignStatus::Recruiting {
        return Err(ApiError::CampaignStillRecruiting);
    }
    Ok(())
}

fn validate_message(message: &str) -> Result<(), ApiError> {
    let len = message.chars().count();
    if !(MESSAGE_MIN_CHARS..=MESSAGE_MAX_CHARS).contains(&len) {
        return Err(ApiError::Validation(
            "지원 동기는 10자 이상 500자 이하로 작성해주세요.".to_string(),
        ));
    }
    Ok(())
}

fn parse_application_status(raw: &str) -> Result<ApplicationStatus, ApiError> {
    ApplicationStatus::parse(raw).ok_or(ApiError::Internal)
}

fn channel_from_snapshot(value: serde_json::Value) -> Result<SnsChannel, ApiError> {
    // 제출 시점에 타입이 보장된 스냅샷이므로 실패는 데이터 손상
    serde_json::from_value(value).map_err(|err| {
        tracing::error!("Corrupt SNS channel snapshot: {:?}", err);
        ApiError::Internal
    })
}

// ============ Service Functions ============

/// 지원서 제출
pub async fn submit_application(
    db: &Database,
    influencer_id: Uuid,
    campaign_id: Uuid,
    request: ApplicationCreateRequest,
) -> Result<ApplicationCreateResponse, ApiError> {
    validate_message(&request.message)?;

    let today = Utc::now().date_naive();

    // 1. 존재
    let campaign = db
        .find_campaign(campaign_id)
        .await?
        .ok_or(ApiError::CampaignNotFound)?;
    let status = CampaignStatus::parse(&campaign.status).ok_or(ApiError::Internal)?;

    // 2. 모집 중
    check_campaign_open(status, campaign.end_date, today)?;

    // 3. 중복 지원
    check_no_duplicate(db.has_live_application(campaign.id, influencer_id).await?)?;

    // 4. 정원
    let current = db.count_applicants(campaign.id).await?;
    check_capacity(current, campaign.total_recruits)?;

    // 5. 방문 희망일
    check_visit_date(request.visit_date, today, campaign.end_date)?;

    // 채널 스냅샷은 JSONB로 복사 저장 (이후 프로필 변경과 무관)
    let snapshot = serde_json::to_value(&request.selected_sns_channel)
        .map_err(|_| ApiError::Internal)?;

    let inserted = db
        .insert_application_guarded(
            campaign.id,
            influencer_id,
            &request.message,
            request.visit_date,
            &snapshot,
            campaign.total_recruits,
        )
        .await
        .map_err(|err| {
            // 사전 검사 이후 비집고 들어온 동시 제출
            if is_unique_violation(&err, APPLICATION_UNIQUE_CONSTRAINT) {
                ApiError::DuplicateApplication
            } else {
                err.into()
            }
        })?;

    // None이면 insert 시점에 정원이 찬 것
    let row = inserted.ok_or(ApiError::CampaignFull)?;

    Ok(ApplicationCreateResponse {
        application_id: row.id,
        campaign_id: row.campaign_id,
        status: parse_application_status(&row.status)?,
    })
}

/// 인플루언서 본인의 지원 목록
///
/// 캠페인이 소프트 삭제되어도 지원 이력은 남고 campaign_deleted로 표시됨
pub async fn get_my_applications(
    db: &Database,
    influencer_id: Uuid,
    query: ApplicationListQuery,
) -> Result<MyApplicationListResponse, ApiError> {
    let limit = normalize_limit(query.limit);
    let offset = normalize_offset(query.offset);

    let (rows, total) = db
        .list_my_applications(
            influencer_id,
            query.status.map(|s| s.as_str()),
            limit,
            offset,
        )
        .await?;

    let mut advertiser_ids: Vec<Uuid> =
        rows.iter().map(|r| r.campaign_advertiser_id).collect();
    advertiser_ids.sort_unstable();
    advertiser_ids.dedup();
    let business_names: HashMap<Uuid, String> = db
        .advertiser_business_names(&advertiser_ids)
        .await?
        .into_iter()
        .collect();

    let applications = rows
        .into_iter()
        .map(|row| {
            Ok(MyApplicationItem {
                id: row.id,
                campaign_id: row.campaign_id,
                message: row.message,
                visit_date: row.visit_date,
                selected_sns_channel: channel_from_snapshot(row.selected_sns_channel)?,
                status: parse_application_status(&row.status)?,
                created_at: row.created_at,
                campaign_title: row.campaign_title,
                campaign_thumbnail: row.campaign_thumbnail,
                campaign_category: row.campaign_category,
                campaign_start_date: row.campaign_start_date,
                campaign_end_date: row.campaign_end_date,
                campaign_deleted: row.campaign_deleted_at.is_some(),
                business_name: business_names
                    .get(&row.campaign_advertiser_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(MyApplicationListResponse {
        applications,
        total,
        has_more: has_more(offset, limit, total),
    })
}

/// 특정 캠페인의 지원자 목록 (소유 광고주 전용)
pub async fn get_campaign_applicants(
    db: &Database,
    advertiser_id: Uuid,
    campaign_id: Uuid,
    query: ApplicationListQuery,
) -> Result<ApplicantListResponse, ApiError> {
    let campaign = db
        .find_campaign(campaign_id)
        .await?
        .ok_or(ApiError::CampaignNotFound)?;

    if campaign.advertiser_id != advertiser_id {
        return Err(ApiError::Forbidden);
    }

    let limit = normalize_limit(query.limit);
    let offset = normalize_offset(query.offset);

    let (rows, total) = db
        .list_campaign_applicants(
            campaign_id,
            query.status.map(|s| s.as_str()),
            limit,
            offset,
        )
        .await?;

    let mut influencer_ids: Vec<Uuid> = rows.iter().map(|r| r.influencer_id).collect();
    influencer_ids.sort_unstable();
    influencer_ids.dedup();
    let names: HashMap<Uuid, String> =
        db.influencer_names(&influencer_ids).await?.into_iter().collect();

    let applicants = rows
        .into_iter()
        .map(|row| {
            Ok(ApplicantItem {
                id: row.id,
                influencer_id: row.influencer_id,
                influencer_name: names
                    .get(&row.influencer_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                message: row.message,
                visit_date: row.visit_date,
                selected_sns_channel: channel_from_snapshot(row.selected_sns_channel)?,
                status: parse_application_status(&row.status)?,
                created_at: row.created_at,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(ApplicantListResponse {
        applicants,
        total,
        has_more: has_more(offset, limit, total),
    })
}

/// 선정/거절
///
/// 이미 결정된 지원서의 재결정도 허용됨 (selected ↔ rejected 번복 가능)
pub async fn decide_application(
    db: &Database,
    advertiser_id: Uuid,
    application_id: Uuid,
    request: DecisionRequest,
) -> Result<OkResponse, ApiError> {
    let application = db
        .find_application_for_decision(application_id)
        .await?
        .ok_or(ApiError::ApplicationNotFound)?;

    let campaign_status =
        CampaignStatus::parse(&application.campaign_status).ok_or(ApiError::Internal)?;

    decision_gate(application.campaign_advertiser_id, advertiser_id, campaign_status)?;

    db.update_application_status(application.id, request.status.as_str())
        .await?;

    Ok(OkResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_campaign_open_gate() {
        let today = date(2024, 6, 5);
        let end = date(2024, 6, 10);

        assert!(check_campaign_open(CampaignStatus::Recruiting, end, today).is_ok());
        // 마감 당일까지는 열림
        assert!(check_campaign_open(CampaignStatus::Recruiting, today, today).is_ok());
        // 마감일 경과
        assert!(check_campaign_open(CampaignStatus::Recruiting, date(2024, 6, 4), today).is_err());

        for status in [
            CampaignStatus::InProgress,
            CampaignStatus::Completed,
            CampaignStatus::Canceled,
        ] {
            let err = check_campaign_open(status, end, today).unwrap_err();
            assert_eq!(err.code(), "CAMPAIGN_CLOSED");
        }
    }

    #[test]
    fn test_duplicate_application_gate() {
        assert!(check_no_duplicate(false).is_ok());

        // 두 번째 제출은 409
        let err = check_no_duplicate(true).unwrap_err();
        assert_eq!(err.parts().0, axum::http::StatusCode::CONFLICT);
        assert_eq!(err.code(), "DUPLICATE_APPLICATION");
    }

    #[test]
    fn test_capacity_gate() {
        assert!(check_capacity(0, 1).is_ok());
        assert!(check_capacity(9, 10).is_ok());

        // 정원 도달 시점부터 차단
        let err = check_capacity(10, 10).unwrap_err();
        assert_eq!(err.parts().0, axum::http::StatusCode::CONFLICT);
        assert_eq!(err.code(), "CAMPAIGN_CLOSED");
        assert!(check_capacity(11, 10).is_err());
    }

    #[test]
    fn test_visit_date_window() {
        let today = date(2024, 6, 5);
        let end = date(2024, 6, 10);

        // 양끝 포함
        assert!(check_visit_date(today, today, end).is_ok());
        assert!(check_visit_date(end, today, end).is_ok());
        assert!(check_visit_date(date(2024, 6, 7), today, end).is_ok());

        assert!(check_visit_date(date(2024, 6, 4), today, end).is_err());
        assert!(check_visit_date(date(2024, 6, 11), today, end).is_err());
    }

    #[test]
    fn test_decision_gate_ownership_first() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        // 비소유자는 캠페인 상태와 무관하게 403
        let err = decision_gate(owner, stranger, CampaignStatus::InProgress).unwrap_err();
        assert_eq!(err.code(), "UNAUTHORIZED_ACCESS");
    }

    #[test]
    fn test_decision_requires_closed_recruitment() {
        let owner = Uuid::new_v4();

        let err = decision_gate(owner, owner, CampaignStatus::Recruiting).unwrap_err();
        assert_eq!(err.code(), "CAMPAIGN_STILL_RECRUITING");

        // 모집 종료 이후 상태에서는 허용
        for status in [
            CampaignStatus::InProgress,
            CampaignStatus::Completed,
            CampaignStatus::Canceled,
        ] {
            assert!(decision_gate(owner, owner, status).is_ok());
        }
    }

    #[test]
    fn test_message_length_bounds() {
        assert!(validate_message("열글자짜리지원동기입니다").is_ok());
        assert!(validate_message("짧음").is_err());
        assert!(validate_message(&"가".repeat(500)).is_ok());
        assert!(validate_message(&"가".repeat(501)).is_err());
    }

    #[test]
    fn test_channel_snapshot_round_trip() {
        let channel = SnsChannel {
            channel_type: crate::types::SnsChannelType::Naver,
            channel_name: "맛집블로그".to_string(),
            url: "https://blog.naver.com/foodie".to_string(),
        };

        let snapshot = serde_json::to_value(&channel).unwrap();
        assert_eq!(snapshot["type"], "naver");
        assert_eq!(channel_from_snapshot(snapshot).unwrap(), channel);

        // 손상된 스냅샷은 내부 오류로 처리
        assert!(channel_from_snapshot(serde_json::json!({"type": "tiktok"})).is_err());
    }
}
