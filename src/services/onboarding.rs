//! Onboarding Service
//!
//! 역할별 프로필 생성(온보딩)과 인플루언서 프로필 조회/수정.
//!
//! 프로필이 만들어지는 순간 users.onboarding_completed가 1회 true로 전환되며,
//! 이 전환은 프로필 insert와 같은 트랜잭션에서 일어남 (부분 실패 불가).

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::{
        is_unique_violation, Database, NewAdvertiserProfile, SnsChannelRow,
        SNS_URL_UNIQUE_CONSTRAINT,
    },
    error::ApiError,
    types::{SnsChannel, SnsChannelType},
    validators,
};

/// 가입 가능 최소 연령
const MIN_AGE: u32 = 14;
/// 프로필당 SNS 채널 수 제한
const MAX_SNS_CHANNELS: usize = 4;
/// 광고주 업종 카테고리
const BUSINESS_CATEGORIES: [&str; 12] = [
    "food", "fashion", "beauty", "life", "digital", "health", "kids", "pet", "culture",
    "travel", "education", "other",
];
/// business_number UNIQUE 제약 이름
const BUSINESS_NUMBER_UNIQUE_CONSTRAINT: &str = "advertiser_profiles_business_number_key";

// ============ Request/Response Types ============

#[derive(Debug, Deserialize)]
pub struct AdvertiserProfileRequest {
    pub name: String,
    pub phone: String,
    pub business_name: String,
    /// 123-45-67890 형식
    pub business_number: String,
    pub representative_name: Option<String>,
    pub category: String,
    pub address: String,
    pub address_detail: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertiserProfileResponse {
    pub profile_id: Uuid,
    pub user_id: Uuid,
    pub business_name: String,
}

#[derive(Debug, Deserialize)]
pub struct InfluencerProfileRequest {
    pub name: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub sns_channels: Vec<SnsChannel>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerProfileResponse {
    pub profile_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
}

/// GET /influencer/profile 응답
#[derive(Debug, Serialize)]
pub struct InfluencerProfileDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub sns_channels: Vec<SnsChannel>,
}

// ============ Validation ============

fn validate_advertiser_request(request: &AdvertiserProfileRequest) -> Result<(), ApiError> {
    let name_len = request.name.chars().count();
    if !(2..=50).contains(&name_len) {
        return Err(ApiError::Validation("이름은 2자 이상 50자 이하여야 합니다.".to_string()));
    }
    if !validators::validate_phone(&request.phone) {
        return Err(ApiError::Validation("올바른 휴대폰 번호 형식이 아닙니다.".to_string()));
    }
    let business_name_len = request.business_name.chars().count();
    if !(2..=100).contains(&business_name_len) {
        return Err(ApiError::Validation("업체명은 2자 이상 100자 이하여야 합니다.".to_string()));
    }
    if !validators::validate_business_number(&request.business_number) {
        return Err(ApiError::Validation("유효하지 않은 사업자등록번호입니다.".to_string()));
    }
    if let Some(representative) = &request.representative_name {
        let len = representative.chars().count();
        if !(2..=50).contains(&len) {
            return Err(ApiError::Validation(
                "대표자명은 2자 이상 50자 이하여야 합니다.".to_string(),
            ));
        }
    }
    if !BUSINESS_CATEGORIES.contains(&request.category.as_str()) {
        return Err(ApiError::Validation("업종 카테고리를 선택해주세요.".to_string()));
    }
    if request.address.chars().count() < 5 {
        return Err(ApiError::Validation("주소를 입력해주세요.".to_string()));
    }
    if let Some(latitude) = request.latitude {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ApiError::Validation("위도 값이 올바르지 않습니다.".to_string()));
        }
    }
    if let Some(longitude) = request.longitude {
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ApiError::Validation("경도 값이 올바르지 않습니다.".to_string()));
        }
    }
    Ok(())
}

fn validate_influencer_request(request: &InfluencerProfileRequest) -> Result<(), ApiError> {
    let name_len = request.name.chars().count();
    if !(2..=50).contains(&name_len) {
        return Err(ApiError::Validation("이름은 2자 이상 50자 이하여야 합니다.".to_string()));
    }
    if !validators::validate_phone(&request.phone) {
        return Err(ApiError::Validation("올바른 휴대폰 번호 형식이 아닙니다.".to_string()));
    }
    if !validators::is_at_least_age(request.birth_date, MIN_AGE, Utc::now().date_naive()) {
        return Err(ApiError::InvalidAge);
    }
    if request.sns_channels.is_empty() || request.sns_channels.len() > MAX_SNS_CHANNELS {
        return Err(ApiError::Validation(
            "SNS 채널은 1개 이상 4개 이하로 등록해주세요.".to_string(),
        ));
    }
    for channel in &request.sns_channels {
        if channel.channel_name.is_empty() {
            return Err(ApiError::Validation("채널명을 입력해주세요.".to_string()));
        }
        if !validators::validate_sns_url(channel.channel_type, &channel.url) {
            return Err(ApiError::Validation(format!(
                "유효하지 않은 {} 채널 URL입니다.",
                channel.channel_type.as_str()
            )));
        }
    }
    Ok(())
}

fn channels_from_rows(rows: Vec<SnsChannelRow>) -> Vec<SnsChannel> {
    rows.into_iter()
        .filter_map(|row| {
            let channel_type = match row.channel_type.as_str() {
                "naver" => SnsChannelType::Naver,
                "youtube" => SnsChannelType::Youtube,
                "instagram" => SnsChannelType::Instagram,
                "threads" => SnsChannelType::Threads,
                _ => return None,
            };
            Some(SnsChannel {
                channel_type,
                channel_name: row.channel_name,
                url: row.url,
            })
        })
        .collect()
}

// ============ Service Functions ============

/// 광고주 프로필 생성
pub async fn create_advertiser_profile(
    db: &Database,
    user_id: Uuid,
    request: AdvertiserProfileRequest,
) -> Result<AdvertiserProfileResponse, ApiError> {
    validate_advertiser_request(&request)?;

    // 하이픈 제거 후 비교/저장
    let business_number = validators::normalize_business_number(&request.business_number);

    if db.business_number_exists(&business_number).await? {
        return Err(ApiError::DuplicateBusinessNumber);
    }

    let profile = db
        .create_advertiser_profile(
            user_id,
            NewAdvertiserProfile {
                name: &request.name,
                phone: &request.phone,
                business_name: &request.business_name,
                business_number: &business_number,
                representative_name: request.representative_name.as_deref(),
                business_category: &request.category,
                address: &request.address,
                address_detail: request.address_detail.as_deref(),
                latitude: request.latitude,
                longitude: request.longitude,
            },
        )
        .await
        .map_err(|err| {
            if is_unique_violation(&err, BUSINESS_NUMBER_UNIQUE_CONSTRAINT) {
                ApiError::DuplicateBusinessNumber
            } else {
                err.into()
            }
        })?;

    Ok(AdvertiserProfileResponse {
        profile_id: profile.id,
        user_id: profile.user_id,
        business_name: profile.business_name,
    })
}

/// 인플루언서 프로필 생성
pub async fn create_influencer_profile(
    db: &Database,
    user_id: Uuid,
    request: InfluencerProfileRequest,
) -> Result<InfluencerProfileResponse, ApiError> {
    validate_influencer_request(&request)?;

    // 생성 시에는 본인 프로필이 아직 없으므로 제외 대상 없음
    let urls: Vec<String> = request.sns_channels.iter().map(|c| c.url.clone()).collect();
    if !db.find_conflicting_sns_urls(&urls, None).await?.is_empty() {
        return Err(ApiError::DuplicateSnsUrl);
    }

    let profile = db
        .create_influencer_profile(
            user_id,
            &request.name,
            &request.phone,
            request.birth_date,
            &request.sns_channels,
        )
        .await
        .map_err(|err| {
            // 동시 등록 레이스는 URL UNIQUE 제약이 잡음
            if is_unique_violation(&err, SNS_URL_UNIQUE_CONSTRAINT) {
                ApiError::DuplicateSnsUrl
            } else {
                err.into()
            }
        })?;

    Ok(InfluencerProfileResponse {
        profile_id: profile.id,
        user_id: profile.user_id,
        name: profile.name,
    })
}

/// 인플루언서 프로필 조회 (채널 포함)
pub async fn get_influencer_profile(
    db: &Database,
    user_id: Uuid,
) -> Result<InfluencerProfileDetail, ApiError> {
    let profile = db
        .find_influencer_profile_by_user(user_id)
        .await?
        .ok_or(ApiError::ProfileNotFound)?;

    let channels = db.list_sns_channels(profile.id).await?;

    Ok(InfluencerProfileDetail {
        id: profile.id,
        user_id: profile.user_id,
        name: profile.name,
        phone: profile.phone,
        birth_date: profile.birth_date,
        sns_channels: channels_from_rows(channels),
    })
}

/// 인플루언서 프로필 전체 교체 업데이트
///
/// 본인 프로필이 이미 보유한 URL은 중복으로 치지 않음 (self-conflict 면제)
pub async fn update_influencer_profile(
    db: &Database,
    user_id: Uuid,
    request: InfluencerProfileRequest,
) -> Result<InfluencerProfileResponse, ApiError> {
    let existing = db
        .find_influencer_profile_by_user(user_id)
        .await?
        .ok_or(ApiError::ProfileNotFound)?;

    validate_influencer_request(&request)?;

    let urls: Vec<String> = request.sns_channels.iter().map(|c| c.url.clone()).collect();
    if !db
        .find_conflicting_sns_urls(&urls, Some(existing.id))
        .await?
        .is_empty()
    {
        return Err(ApiError::DuplicateSnsUrl);
    }

    let profile = db
        .replace_influencer_profile(
            existing.id,
            &request.name,
            &request.phone,
            request.birth_date,
            &request.sns_channels,
        )
        .await
        .map_err(|err| {
            if is_unique_violation(&err, SNS_URL_UNIQUE_CONSTRAINT) {
                ApiError::DuplicateSnsUrl
            } else {
                err.into()
            }
        })?;

    Ok(InfluencerProfileResponse {
        profile_id: profile.id,
        user_id: profile.user_id,
        name: profile.name,
    })
}
