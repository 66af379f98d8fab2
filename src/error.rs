//! Error Handling Module
//!
//! Provides type-safe error handling with proper HTTP status code mapping.
//! Uses thiserror for domain errors and integrates with tracing for structured logging.
//!
//! # Design Decision
//!
//! 서비스 레이어는 예상 가능한 도메인 실패를 예외가 아닌 `Result<T, ApiError>`로
//! 반환하고, 라우트 레이어는 `IntoResponse`를 통해 1:1로 HTTP 상태/바디에 매핑함.
//! 모든 실패 응답은 `{error: {code, message, details?}}` 형태의 고정 envelope.
//!
//! 민감한 내부 정보(저장소 에러 상세 등)는 클라이언트에 노출하지 않음

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API 에러 타입
///
/// 각 variant는 (HTTP 상태, 안정적인 머신 코드, 사용자 메시지)에 매핑됨
#[derive(Debug, Error)]
pub enum ApiError {
    // ============ 400 Bad Request ============
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Duplicate business number")]
    DuplicateBusinessNumber,

    #[error("Duplicate SNS URL")]
    DuplicateSnsUrl,

    #[error("Under minimum age")]
    InvalidAge,

    #[error("Advertiser profile missing")]
    AdvertiserProfileMissing,

    #[error("Campaign is not recruiting")]
    CampaignNotRecruiting,

    #[error("Campaign recruitment is closed")]
    CampaignClosed,

    #[error("Campaign is still recruiting")]
    CampaignStillRecruiting,

    #[error("Visit date out of range")]
    InvalidVisitDate,

    // ============ 401 Unauthorized ============
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // ============ 403 Forbidden ============
    #[error("Not the resource owner")]
    Forbidden,

    // ============ 404 Not Found ============
    #[error("Campaign not found")]
    CampaignNotFound,

    #[error("Application not found")]
    ApplicationNotFound,

    #[error("Profile not found")]
    ProfileNotFound,

    #[error("User not found")]
    UserNotFound,

    // ============ 409 Conflict ============
    #[error("Duplicate application")]
    DuplicateApplication,

    /// 모집 인원 마감 — 원 설계대로 CAMPAIGN_CLOSED 코드를 공유하되
    /// 409 상태와 별도 메시지로 구분
    #[error("Campaign capacity reached")]
    CampaignFull,

    // ============ 500 Internal Server Error ============
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error")]
    Internal,
}

/// API 에러 응답 envelope
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// (상태 코드, 머신 코드, 사용자 메시지)
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            ApiError::EmailAlreadyExists => (
                StatusCode::BAD_REQUEST,
                "EMAIL_ALREADY_EXISTS",
                "이미 가입된 이메일입니다.".to_string(),
            ),
            ApiError::DuplicateBusinessNumber => (
                StatusCode::BAD_REQUEST,
                "DUPLICATE_BUSINESS_NUMBER",
                "이미 등록된 사업자등록번호입니다.".to_string(),
            ),
            ApiError::DuplicateSnsUrl => (
                StatusCode::BAD_REQUEST,
                "DUPLICATE_SNS_URL",
                "이미 등록된 SNS URL입니다.".to_string(),
            ),
            ApiError::InvalidAge => (
                StatusCode::BAD_REQUEST,
                "INVALID_AGE",
                "만 14세 이상만 가입 가능합니다.".to_string(),
            ),
            ApiError::AdvertiserProfileMissing => (
                StatusCode::BAD_REQUEST,
                "PROFILE_NOT_FOUND",
                "광고주 프로필이 존재하지 않습니다.".to_string(),
            ),
            ApiError::CampaignNotRecruiting => (
                StatusCode::BAD_REQUEST,
                "CAMPAIGN_NOT_RECRUITING",
                "모집 중인 체험단만 조기 종료할 수 있습니다.".to_string(),
            ),
            ApiError::CampaignClosed => (
                StatusCode::BAD_REQUEST,
                "CAMPAIGN_CLOSED",
                "모집이 종료된 체험단입니다.".to_string(),
            ),
            ApiError::CampaignStillRecruiting => (
                StatusCode::BAD_REQUEST,
                "CAMPAIGN_STILL_RECRUITING",
                "모집이 진행 중인 체험단은 인플루언서를 선정할 수 없습니다. 먼저 모집을 종료해주세요."
                    .to_string(),
            ),
            ApiError::InvalidVisitDate => (
                StatusCode::BAD_REQUEST,
                "INVALID_VISIT_DATE",
                "방문 희망 날짜는 오늘부터 모집 마감일까지만 선택 가능합니다.".to_string(),
            ),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "인증되지 않은 사용자입니다.".to_string(),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "이메일 또는 비밀번호가 올바르지 않습니다.".to_string(),
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "UNAUTHORIZED_ACCESS",
                "이 리소스에 접근할 권한이 없습니다.".to_string(),
            ),
            ApiError::CampaignNotFound => (
                StatusCode::NOT_FOUND,
                "CAMPAIGN_NOT_FOUND",
                "체험단을 찾을 수 없습니다.".to_string(),
            ),
            ApiError::ApplicationNotFound => (
                StatusCode::NOT_FOUND,
                "APPLICATION_NOT_FOUND",
                "지원서를 찾을 수 없습니다.".to_string(),
            ),
            ApiError::ProfileNotFound => (
                StatusCode::NOT_FOUND,
                "PROFILE_NOT_FOUND",
                "프로필을 찾을 수 없습니다.".to_string(),
            ),
            ApiError::UserNotFound => (
                StatusCode::NOT_FOUND,
                "USER_NOT_FOUND",
                "사용자 정보를 찾을 수 없습니다.".to_string(),
            ),
            ApiError::DuplicateApplication => (
                StatusCode::CONFLICT,
                "DUPLICATE_APPLICATION",
                "이미 지원한 체험단입니다.".to_string(),
            ),
            ApiError::CampaignFull => (
                StatusCode::CONFLICT,
                "CAMPAIGN_CLOSED",
                "모집 인원이 마감되었습니다.".to_string(),
            ),
            ApiError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "일시적인 오류가 발생했습니다. 잠시 후 다시 시도해주세요.".to_string(),
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "내부 오류가 발생했습니다.".to_string(),
            ),
        }
    }

    pub fn code(&self) -> &'static str {
        self.parts().1
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // 5xx는 서버 측에 상세 로그, 클라이언트에는 일반 메시지만
        if matches!(self, ApiError::Database(_) | ApiError::Internal) {
            tracing::error!("Internal failure: {:?}", self);
        }

        let (status, code, message) = self.parts();

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// SQLx 에러를 ApiError로 변환
///
/// unique 제약 위반은 도메인 충돌로 복원 (중복 지원 / 중복 SNS URL 등은
/// 서비스 레이어에서 제약 이름으로 재분류함)
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("SQLx error: {:?}", err);
        ApiError::Database(err.to_string())
    }
}

/// anyhow 에러를 ApiError로 변환
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("Anyhow error: {:?}", err);
        ApiError::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::CampaignNotFound.parts().0, StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Forbidden.parts().0, StatusCode::FORBIDDEN);
        assert_eq!(ApiError::DuplicateApplication.parts().0, StatusCode::CONFLICT);
        assert_eq!(ApiError::CampaignFull.parts().0, StatusCode::CONFLICT);
        assert_eq!(
            ApiError::CampaignStillRecruiting.parts().0,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_capacity_shares_closed_code() {
        // 인원 마감과 모집 종료는 같은 머신 코드를 공유 (원 설계 유지)
        assert_eq!(ApiError::CampaignFull.code(), "CAMPAIGN_CLOSED");
        assert_eq!(ApiError::CampaignClosed.code(), "CAMPAIGN_CLOSED");
    }
}
