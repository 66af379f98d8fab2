//! Database Models
//!
//! 테이블 행과 1:1로 대응하는 구조체들.
//! 상태 컬럼은 TEXT로 저장하고 API 경계에서 enum으로 파싱함.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// 사용자
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    /// salt$digest 형식 (services::identity 참고)
    pub password_hash: String,
    /// advertiser | influencer
    pub role: String,
    /// 역할별 프로필 생성 시 1회 true로 전환
    pub onboarding_completed: bool,
    pub created_at: DateTime<Utc>,
}

/// 광고주 프로필
#[derive(Debug, Clone, FromRow)]
pub struct AdvertiserProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub business_name: String,
    /// 하이픈 제거된 10자리
    pub business_number: String,
    pub representative_name: Option<String>,
    pub business_category: String,
    pub address: String,
    pub address_detail: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// 인플루언서 프로필 (채널은 sns_channels 테이블에 정규화)
#[derive(Debug, Clone, FromRow)]
pub struct InfluencerProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// SNS 채널 (URL은 전체 프로필에 걸쳐 UNIQUE)
#[derive(Debug, Clone, FromRow)]
pub struct SnsChannelRow {
    pub id: Uuid,
    pub profile_id: Uuid,
    /// naver | youtube | instagram | threads
    pub channel_type: String,
    pub channel_name: String,
    pub url: String,
}

/// 체험단
#[derive(Debug, Clone, FromRow)]
pub struct CampaignRow {
    pub id: Uuid,
    pub advertiser_id: Uuid,
    pub advertiser_profile_id: Uuid,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub benefits: String,
    pub missions: String,
    pub notes: Option<String>,
    pub additional_images: Option<serde_json::Value>,
    pub store_info: Option<serde_json::Value>,
    pub category: String,
    pub region: Option<String>,
    pub total_recruits: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// recruiting | in_progress | completed | canceled
    pub status: String,
    pub view_count: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// 소프트 삭제 시각 (NULL이면 활성)
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// 지원서
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub influencer_id: Uuid,
    pub message: String,
    pub visit_date: NaiveDate,
    /// 지원 시점의 채널 스냅샷 (JSONB)
    pub selected_sns_channel: serde_json::Value,
    /// pending | selected | rejected
    pub status: String,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// 지원서 + 상위 체험단 요약 (내 지원 목록 조회용 조인 행)
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationWithCampaignRow {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub message: String,
    pub visit_date: NaiveDate,
    pub selected_sns_channel: serde_json::Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub campaign_title: String,
    pub campaign_thumbnail: Option<String>,
    pub campaign_category: String,
    pub campaign_start_date: NaiveDate,
    pub campaign_end_date: NaiveDate,
    pub campaign_deleted_at: Option<DateTime<Utc>>,
    pub campaign_advertiser_id: Uuid,
}

/// 지원서 상태 변경 게이트에 필요한 최소 조인 행
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationDecisionRow {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub campaign_advertiser_id: Uuid,
    pub campaign_status: String,
}
