//! Common Types Module
//!
//! 애플리케이션 전반에서 사용되는 공통 도메인 타입 정의

use serde::{Deserialize, Serialize};

/// 사용자 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Advertiser,
    Influencer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Advertiser => "advertiser",
            UserRole::Influencer => "influencer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "advertiser" => Some(UserRole::Advertiser),
            "influencer" => Some(UserRole::Influencer),
            _ => None,
        }
    }
}

/// 체험단 상태
///
/// recruiting → in_progress 전이는 모집 조기 종료가 유일한 경로
/// completed / canceled 전이는 별도 운영 배치에서 처리 (이 서버 범위 밖)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Recruiting,
    InProgress,
    Completed,
    Canceled,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Recruiting => "recruiting",
            CampaignStatus::InProgress => "in_progress",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "recruiting" => Some(CampaignStatus::Recruiting),
            "in_progress" => Some(CampaignStatus::InProgress),
            "completed" => Some(CampaignStatus::Completed),
            "canceled" => Some(CampaignStatus::Canceled),
            _ => None,
        }
    }
}

/// 지원서 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Selected,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Selected => "selected",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ApplicationStatus::Pending),
            "selected" => Some(ApplicationStatus::Selected),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

/// SNS 플랫폼 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnsChannelType {
    Naver,
    Youtube,
    Instagram,
    Threads,
}

impl SnsChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnsChannelType::Naver => "naver",
            SnsChannelType::Youtube => "youtube",
            SnsChannelType::Instagram => "instagram",
            SnsChannelType::Threads => "threads",
        }
    }
}

/// SNS 채널
///
/// 지원서에는 지원 시점의 스냅샷이 JSONB로 복사 저장됨
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnsChannel {
    #[serde(rename = "type")]
    pub channel_type: SnsChannelType,
    pub channel_name: String,
    pub url: String,
}

/// 체험단 목록 정렬 기준
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignSort {
    #[default]
    Latest,
    Deadline,
    Popular,
}

/// 본문 없는 성공 응답
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub success: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

// ============ Pagination ============

/// 페이지 크기 기본값 / 상한
pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// limit 쿼리 파라미터 정규화 (1..=100, 기본 20)
pub fn normalize_limit(limit: Option<u32>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT) as i64
}

/// offset 쿼리 파라미터 정규화 (0 이상, 기본 0)
pub fn normalize_offset(offset: Option<u32>) -> i64 {
    offset.unwrap_or(0) as i64
}

/// 모든 목록 응답이 공유하는 has_more 계산
pub fn has_more(offset: i64, limit: i64, total: i64) -> bool {
    offset + limit < total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            CampaignStatus::Recruiting,
            CampaignStatus::InProgress,
            CampaignStatus::Completed,
            CampaignStatus::Canceled,
        ] {
            assert_eq!(CampaignStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(CampaignStatus::parse("unknown"), None);
    }

    #[test]
    fn test_has_more_boundaries() {
        // total=45: 첫 페이지는 다음 페이지 있음, offset 40이면 마지막
        assert!(has_more(0, 20, 45));
        assert!(has_more(20, 20, 45));
        assert!(!has_more(40, 20, 45));
        // 정확히 나누어떨어지는 경우
        assert!(!has_more(20, 20, 40));
        assert!(!has_more(0, 20, 0));
    }

    #[test]
    fn test_limit_normalization() {
        assert_eq!(normalize_limit(None), 20);
        assert_eq!(normalize_limit(Some(0)), 1);
        assert_eq!(normalize_limit(Some(500)), 100);
        assert_eq!(normalize_limit(Some(50)), 50);
    }

    #[test]
    fn test_sns_channel_json_shape() {
        let channel = SnsChannel {
            channel_type: SnsChannelType::Instagram,
            channel_name: "my_channel".to_string(),
            url: "https://instagram.com/my_channel".to_string(),
        };
        let json = serde_json::to_value(&channel).unwrap();
        assert_eq!(json["type"], "instagram");
        assert_eq!(json["channel_name"], "my_channel");
    }
}
