//! Campaign Service
//!
//! 체험단 수명주기 관리: 목록/상세/생성/수정/소프트 삭제/모집 조기 종료.
//!
//! # State Machine
//!
//! ```text
//! recruiting --[close_recruitment (소유 광고주)]--> in_progress
//! completed / canceled 전이는 별도 운영 프로세스 (이 서버에 진입점 없음)
//! ```
//!
//! 모든 변경 연산은 소유권 게이트(404 → 403 순서)를 통과해야 함

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{
    db::{CampaignListFilter, CampaignPatch, CampaignRow, Database, NewCampaign},
    error::ApiError,
    types::{has_more, normalize_limit, normalize_offset, CampaignSort, CampaignStatus, OkResponse},
};

/// 목록에서 광고주 프로필이 지워진 경우의 표시 이름
const UNKNOWN_BUSINESS: &str = "알 수 없음";

// ============ Request/Response Types ============

#[derive(Debug, Default, Deserialize)]
pub struct CampaignListQuery {
    pub status: Option<CampaignStatus>,
    pub category: Option<String>,
    pub region: Option<String>,
    pub search: Option<String>,
    pub sort: Option<CampaignSort>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CampaignCard {
    pub id: Uuid,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub business_name: String,
    pub category: String,
    pub region: Option<String>,
    pub total_recruits: i32,
    pub current_applicants: i64,
    pub end_date: NaiveDate,
    pub status: CampaignStatus,
}

#[derive(Debug, Serialize)]
pub struct CampaignListResponse {
    pub campaigns: Vec<CampaignCard>,
    pub total: i64,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
pub struct CampaignDetail {
    pub id: Uuid,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub benefits: String,
    pub missions: String,
    pub notes: Option<String>,
    pub additional_images: Option<serde_json::Value>,
    pub store_info: Option<serde_json::Value>,
    pub business_name: String,
    pub business_category: String,
    pub category: String,
    pub region: Option<String>,
    pub total_recruits: i32,
    pub current_applicants: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: CampaignStatus,
    pub view_count: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// 매장 안내 정보 (JSONB로 통째 저장)
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreInfo {
    pub store_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub hours: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CampaignCreateRequest {
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub benefits: String,
    pub missions: String,
    pub notes: Option<String>,
    pub additional_images: Option<Vec<String>>,
    pub store_info: Option<StoreInfo>,
    pub category: String,
    pub region: Option<String>,
    pub total_recruits: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// PATCH 본문: 누락 필드는 유지, null은 NULL로 지움
///
/// serde 기본 동작은 null과 누락을 구분하지 못하므로 nullable 필드는
/// double-Option + 커스텀 deserializer 사용
#[derive(Debug, Default, Deserialize)]
pub struct CampaignUpdateRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub thumbnail_url: Option<Option<String>>,
    pub benefits: Option<String>,
    pub missions: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub additional_images: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub store_info: Option<Option<StoreInfo>>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub region: Option<Option<String>>,
    pub total_recruits: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub longitude: Option<Option<f64>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
pub struct CampaignCreateResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdvertiserCampaignQuery {
    pub status: Option<CampaignStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct AdvertiserCampaignItem {
    pub id: Uuid,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub category: String,
    pub region: Option<String>,
    pub total_recruits: i32,
    pub current_applicants: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: CampaignStatus,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AdvertiserCampaignListResponse {
    pub campaigns: Vec<AdvertiserCampaignItem>,
    pub total: i64,
    pub has_more: bool,
}

// ============ Gates / Validation ============

/// 소유권 게이트: 소유 광고주가 아니면 403
fn ownership_gate(owner: Uuid, caller: Uuid) -> Result<(), ApiError> {
    if owner == caller {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// 모집 조기 종료 게이트
///
/// 소유권 확인 후 recruiting 상태에서만 전이 허용
fn close_recruitment_gate(
    owner: Uuid,
    caller: Uuid,
    status: CampaignStatus,
) -> Result<(), ApiError> {
    ownership_gate(owner, caller)?;
    if status != CampaignStatus::Recruiting {
        return Err(ApiError::CampaignNotRecruiting);
    }
    Ok(())
}

fn validate_create_request(request: &CampaignCreateRequest) -> Result<(), ApiError> {
    let title_len = request.title.chars().count();
    if !(1..=100).contains(&title_len) {
        return Err(ApiError::Validation("제목은 1자 이상 100자 이하여야 합니다.".to_string()));
    }
    if request.benefits.is_empty() || request.missions.is_empty() {
        return Err(ApiError::Validation("제공 혜택과 미션을 입력해주세요.".to_string()));
    }
    if !(1..=1000).contains(&request.total_recruits) {
        return Err(ApiError::Validation(
            "모집 인원은 1명 이상 1000명 이하여야 합니다.".to_string(),
        ));
    }
    if request.end_date < request.start_date {
        return Err(ApiError::Validation(
            "모집 마감일은 시작일 이후여야 합니다.".to_string(),
        ));
    }
    Ok(())
}

/// 패치 적용 후의 날짜/인원이 생성 시 규칙을 유지하는지 확인
fn validate_update_request(
    request: &CampaignUpdateRequest,
    existing: &CampaignRow,
) -> Result<(), ApiError> {
    if let Some(title) = &request.title {
        let len = title.chars().count();
        if !(1..=100).contains(&len) {
            return Err(ApiError::Validation("제목은 1자 이상 100자 이하여야 합니다.".to_string()));
        }
    }
    if let Some(total_recruits) = request.total_recruits {
        if !(1..=1000).contains(&total_recruits) {
            return Err(ApiError::Validation(
                "모집 인원은 1명 이상 1000명 이하여야 합니다.".to_string(),
            ));
        }
    }
    let start = request.start_date.unwrap_or(existing.start_date);
    let end = request.end_date.unwrap_or(existing.end_date);
    if end < start {
        return Err(ApiError::Validation(
            "모집 마감일은 시작일 이후여야 합니다.".to_string(),
        ));
    }
    Ok(())
}

/// 2자 미만 검색어는 무시 (원 설계)
fn effective_search(search: Option<&str>) -> Option<&str> {
    search
        .map(str::trim)
        .filter(|s| s.chars().count() >= 2)
}

fn parse_status(row: &CampaignRow) -> Result<CampaignStatus, ApiError> {
    CampaignStatus::parse(&row.status).ok_or(ApiError::Internal)
}

// ============ Service Functions ============

/// 공개 체험단 목록
///
/// 기본 recruiting 필터 + 마감일 경과 캠페인 제외.
/// 지원자 수와 사업자명은 batch-fetch 후 맵 조인 (N+1 회피)
pub async fn get_campaigns(
    db: &Database,
    query: CampaignListQuery,
) -> Result<CampaignListResponse, ApiError> {
    let status = query.status.unwrap_or(CampaignStatus::Recruiting);
    let limit = normalize_limit(query.limit);
    let offset = normalize_offset(query.offset);
    let today = Utc::now().date_naive();

    let filter = CampaignListFilter {
        status: status.as_str(),
        category: query.category.as_deref(),
        region: query.region.as_deref(),
        search: effective_search(query.search.as_deref()),
        hide_expired_before: Some(today),
        sort: query.sort.unwrap_or_default(),
        limit,
        offset,
    };

    let (rows, total) = db.list_campaigns(&filter).await?;

    let ids: Vec<Uuid> = rows.iter().map(|c| c.id).collect();
    let applicant_counts: HashMap<Uuid, i64> =
        db.count_applicants_for(&ids).await?.into_iter().collect();

    let mut advertiser_ids: Vec<Uuid> = rows.iter().map(|c| c.advertiser_id).collect();
    advertiser_ids.sort_unstable();
    advertiser_ids.dedup();
    let business_names: HashMap<Uuid, String> = db
        .advertiser_business_names(&advertiser_ids)
        .await?
        .into_iter()
        .collect();

    let campaigns = rows
        .into_iter()
        .map(|row| {
            let status = parse_status(&row)?;
            Ok(CampaignCard {
                id: row.id,
                title: row.title,
                thumbnail_url: row.thumbnail_url,
                business_name: business_names
                    .get(&row.advertiser_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_BUSINESS.to_string()),
                category: row.category,
                region: row.region,
                total_recruits: row.total_recruits,
                current_applicants: applicant_counts.get(&row.id).copied().unwrap_or(0),
                end_date: row.end_date,
                status,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(CampaignListResponse {
        campaigns,
        total,
        has_more: has_more(offset, limit, total),
    })
}

/// 체험단 상세
///
/// 소프트 삭제된 캠페인은 404.
/// 조회수 증가는 fire-and-forget — 실패해도 응답에는 영향 없음
pub async fn get_campaign_by_id(
    db: &Arc<Database>,
    campaign_id: Uuid,
) -> Result<CampaignDetail, ApiError> {
    let row = db
        .find_campaign(campaign_id)
        .await?
        .ok_or(ApiError::CampaignNotFound)?;

    let status = parse_status(&row)?;

    let advertiser = db.find_advertiser_profile_by_user(row.advertiser_id).await?;
    let current_applicants = db.count_applicants(campaign_id).await?;

    // 조회수 증가 (best-effort)
    let db_clone = Arc::clone(db);
    tokio::spawn(async move {
        if let Err(err) = db_clone.increment_view_count(campaign_id).await {
            tracing::warn!("View count increment failed for {}: {:?}", campaign_id, err);
        }
    });

    let (business_name, business_category) = advertiser
        .map(|p| (p.business_name, p.business_category))
        .unwrap_or_else(|| (UNKNOWN_BUSINESS.to_string(), String::new()));

    Ok(CampaignDetail {
        id: row.id,
        title: row.title,
        thumbnail_url: row.thumbnail_url,
        benefits: row.benefits,
        missions: row.missions,
        notes: row.notes,
        additional_images: row.additional_images,
        store_info: row.store_info,
        business_name,
        business_category,
        category: row.category,
        region: row.region,
        total_recruits: row.total_recruits,
        current_applicants,
        start_date: row.start_date,
        end_date: row.end_date,
        status,
        view_count: row.view_count,
        latitude: row.latitude,
        longitude: row.longitude,
    })
}

/// 체험단 생성 (광고주 프로필 필수)
pub async fn create_campaign(
    db: &Database,
    advertiser_id: Uuid,
    request: CampaignCreateRequest,
) -> Result<CampaignCreateResponse, ApiError> {
    validate_create_request(&request)?;

    let profile = db
        .find_advertiser_profile_by_user(advertiser_id)
        .await?
        .ok_or(ApiError::AdvertiserProfileMissing)?;

    // 썸네일 미지정 시 랜덤 시드 placeholder 발급
    let thumbnail_url = request.thumbnail_url.clone().unwrap_or_else(|| {
        format!(
            "https://picsum.photos/seed/{}-{:x}/800/600",
            Utc::now().timestamp_millis(),
            rand::random::<u32>()
        )
    });

    let additional_images = request
        .additional_images
        .as_ref()
        .map(|images| serde_json::json!(images));
    let store_info = request.store_info.as_ref().map(|info| serde_json::json!(info));

    let (id, created_at) = db
        .insert_campaign(NewCampaign {
            advertiser_id,
            advertiser_profile_id: profile.id,
            title: &request.title,
            thumbnail_url: &thumbnail_url,
            benefits: &request.benefits,
            missions: &request.missions,
            notes: request.notes.as_deref(),
            additional_images: additional_images.as_ref(),
            store_info: store_info.as_ref(),
            category: &request.category,
            region: request.region.as_deref(),
            total_recruits: request.total_recruits,
            start_date: request.start_date,
            end_date: request.end_date,
            latitude: request.latitude,
            longitude: request.longitude,
        })
        .await?;

    Ok(CampaignCreateResponse { id, created_at })
}

/// 광고주 본인 캠페인 목록 (만료 제외 없이 전부 노출)
pub async fn get_advertiser_campaigns(
    db: &Database,
    advertiser_id: Uuid,
    query: AdvertiserCampaignQuery,
) -> Result<AdvertiserCampaignListResponse, ApiError> {
    let limit = normalize_limit(query.limit);
    let offset = normalize_offset(query.offset);

    let (rows, total) = db
        .list_advertiser_campaigns(
            advertiser_id,
            query.status.map(|s| s.as_str()),
            limit,
            offset,
        )
        .await?;

    let ids: Vec<Uuid> = rows.iter().map(|c| c.id).collect();
    let applicant_counts: HashMap<Uuid, i64> =
        db.count_applicants_for(&ids).await?.into_iter().collect();

    let campaigns = rows
        .into_iter()
        .map(|row| {
            let status = parse_status(&row)?;
            Ok(AdvertiserCampaignItem {
                id: row.id,
                title: row.title,
                thumbnail_url: row.thumbnail_url,
                category: row.category,
                region: row.region,
                total_recruits: row.total_recruits,
                current_applicants: applicant_counts.get(&row.id).copied().unwrap_or(0),
                start_date: row.start_date,
                end_date: row.end_date,
                status,
                view_count: row.view_count,
                created_at: row.created_at,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(AdvertiserCampaignListResponse {
        campaigns,
        total,
        has_more: has_more(offset, limit, total),
    })
}

/// 부분 수정 (포함된 필드만 반영, 상태 전이 없음)
pub async fn update_campaign(
    db: &Database,
    advertiser_id: Uuid,
    campaign_id: Uuid,
    request: CampaignUpdateRequest,
) -> Result<OkResponse, ApiError> {
    let existing = db
        .find_campaign(campaign_id)
        .await?
        .ok_or(ApiError::CampaignNotFound)?;

    ownership_gate(existing.advertiser_id, advertiser_id)?;
    validate_update_request(&request, &existing)?;

    let patch = CampaignPatch {
        title: request.title,
        thumbnail_url: request.thumbnail_url,
        benefits: request.benefits,
        missions: request.missions,
        notes: request.notes,
        additional_images: request
            .additional_images
            .map(|opt| opt.map(|images| serde_json::json!(images))),
        store_info: request
            .store_info
            .map(|opt| opt.map(|info| serde_json::json!(info))),
        category: request.category,
        region: request.region,
        total_recruits: request.total_recruits,
        start_date: request.start_date,
        end_date: request.end_date,
        latitude: request.latitude,
        longitude: request.longitude,
    };

    db.update_campaign(campaign_id, patch).await?;

    Ok(OkResponse::ok())
}

/// 소프트 삭제 (지원서에는 전파하지 않음)
pub async fn delete_campaign(
    db: &Database,
    advertiser_id: Uuid,
    campaign_id: Uuid,
) -> Result<OkResponse, ApiError> {
    let existing = db
        .find_campaign(campaign_id)
        .await?
        .ok_or(ApiError::CampaignNotFound)?;

    ownership_gate(existing.advertiser_id, advertiser_id)?;

    db.soft_delete_campaign(campaign_id).await?;

    Ok(OkResponse::ok())
}

/// 모집 조기 종료: recruiting → in_progress
///
/// 선정/거절이 가능해지는 유일한 경로이므로 상태 게이트가 핵심
pub async fn close_recruitment(
    db: &Database,
    advertiser_id: Uuid,
    campaign_id: Uuid,
) -> Result<OkResponse, ApiError> {
    let existing = db
        .find_campaign(campaign_id)
        .await?
        .ok_or(ApiError::CampaignNotFound)?;

    let status = parse_status(&existing)?;
    close_recruitment_gate(existing.advertiser_id, advertiser_id, status)?;

    db.close_campaign(campaign_id).await?;

    Ok(OkResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CampaignCreateRequest {
        CampaignCreateRequest {
            title: "동네 맛집 체험단".to_string(),
            thumbnail_url: None,
            benefits: "2인 식사권 제공".to_string(),
            missions: "블로그 리뷰 작성".to_string(),
            notes: None,
            additional_images: None,
            store_info: None,
            category: "food".to_string(),
            region: Some("서울".to_string()),
            total_recruits: 10,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 8).unwrap(),
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn test_close_gate_requires_ownership_first() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        // 비소유자는 상태와 무관하게 403
        let err = close_recruitment_gate(owner, stranger, CampaignStatus::Recruiting).unwrap_err();
        assert_eq!(err.code(), "UNAUTHORIZED_ACCESS");
    }

    #[test]
    fn test_close_gate_only_from_recruiting() {
        let owner = Uuid::new_v4();

        assert!(close_recruitment_gate(owner, owner, CampaignStatus::Recruiting).is_ok());

        for status in [
            CampaignStatus::InProgress,
            CampaignStatus::Completed,
            CampaignStatus::Canceled,
        ] {
            let err = close_recruitment_gate(owner, owner, status).unwrap_err();
            assert_eq!(err.code(), "CAMPAIGN_NOT_RECRUITING");
        }
    }

    #[test]
    fn test_create_validation_recruit_bounds() {
        let mut request = create_request();
        assert!(validate_create_request(&request).is_ok());

        request.total_recruits = 0;
        assert!(validate_create_request(&request).is_err());

        request.total_recruits = 1001;
        assert!(validate_create_request(&request).is_err());

        request.total_recruits = 1000;
        assert!(validate_create_request(&request).is_ok());
    }

    #[test]
    fn test_create_validation_date_order() {
        let mut request = create_request();
        request.end_date = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        assert!(validate_create_request(&request).is_err());

        // 당일 마감은 허용 (end == start)
        request.end_date = request.start_date;
        assert!(validate_create_request(&request).is_ok());
    }

    #[test]
    fn test_search_term_minimum_length() {
        assert_eq!(effective_search(Some("떡볶이")), Some("떡볶이"));
        assert_eq!(effective_search(Some("ab")), Some("ab"));
        assert_eq!(effective_search(Some("a")), None);
        assert_eq!(effective_search(Some(" a ")), None);
        assert_eq!(effective_search(None), None);
    }
}
