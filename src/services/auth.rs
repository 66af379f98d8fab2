//! Auth Service
//!
//! 가입 / 로그인 / 현재 사용자 조회.
//! 약관 동의 내역은 감사 목적으로 버전과 함께 보존됨.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::{is_unique_violation, AgreementEntry, Database},
    error::ApiError,
    services::identity::IdentityService,
    types::UserRole,
    validators,
};

/// 현재 약관 버전
const AGREEMENT_VERSION: &str = "1.0";
/// users.email UNIQUE 제약 이름
const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

// ============ Request/Response Types ============

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub agreements: SignupAgreements,
}

#[derive(Debug, Deserialize)]
pub struct SignupAgreements {
    pub terms: bool,
    pub privacy: bool,
    #[serde(default)]
    pub marketing: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub needs_onboarding: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub onboarding_completed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub onboarding_completed: bool,
}

// ============ Service Functions ============

/// 회원가입
///
/// 이메일/비밀번호/약관 검증 → 중복 확인 → 사용자 + 약관을 한 트랜잭션으로 저장
pub async fn signup(
    db: &Database,
    identity: &IdentityService,
    request: SignupRequest,
) -> Result<SignupResponse, ApiError> {
    if !validators::validate_email(&request.email) {
        return Err(ApiError::Validation(
            "유효하지 않은 이메일입니다. 실제 이메일 주소를 사용해주세요.".to_string(),
        ));
    }

    if let Err(errors) = validators::validate_password(&request.password) {
        return Err(ApiError::Validation(errors.join(" ")));
    }

    // 필수 약관 (이용약관 + 개인정보처리방침)
    if !request.agreements.terms || !request.agreements.privacy {
        return Err(ApiError::Validation(
            "이용약관과 개인정보처리방침 동의는 필수입니다.".to_string(),
        ));
    }

    if db.find_user_by_email(&request.email).await?.is_some() {
        return Err(ApiError::EmailAlreadyExists);
    }

    let password_hash = identity.hash_password(&request.password);

    let mut agreements = vec![
        AgreementEntry {
            agreement_type: "terms",
            agreement_version: AGREEMENT_VERSION,
        },
        AgreementEntry {
            agreement_type: "privacy",
            agreement_version: AGREEMENT_VERSION,
        },
    ];
    if request.agreements.marketing {
        agreements.push(AgreementEntry {
            agreement_type: "marketing",
            agreement_version: AGREEMENT_VERSION,
        });
    }

    let user = db
        .create_user_with_agreements(
            &request.email,
            &password_hash,
            request.role.as_str(),
            &agreements,
        )
        .await
        .map_err(|err| {
            // 동시 가입 레이스는 UNIQUE 제약이 잡음
            if is_unique_violation(&err, EMAIL_UNIQUE_CONSTRAINT) {
                ApiError::EmailAlreadyExists
            } else {
                err.into()
            }
        })?;

    Ok(SignupResponse {
        user_id: user.id,
        email: user.email,
        role: request.role,
        needs_onboarding: true,
    })
}

/// 로그인
///
/// 이메일 미존재와 비밀번호 불일치는 구분하지 않고 INVALID_CREDENTIALS로 수렴
pub async fn login(
    db: &Database,
    identity: &IdentityService,
    request: LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let user = db
        .find_user_by_email(&request.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !identity.verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let role = UserRole::parse(&user.role).ok_or(ApiError::Internal)?;
    let token = identity.issue_token(user.id)?;

    Ok(LoginResponse {
        token,
        user_id: user.id,
        email: user.email,
        role,
        onboarding_completed: user.onboarding_completed,
    })
}

/// 현재 사용자 조회 (bearer 토큰으로 해석된 id 기준)
pub async fn current_user(db: &Database, user_id: Uuid) -> Result<CurrentUserResponse, ApiError> {
    let user = db
        .find_user_by_id(user_id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    let role = UserRole::parse(&user.role).ok_or(ApiError::Internal)?;

    Ok(CurrentUserResponse {
        user_id: user.id,
        email: user.email,
        role,
        onboarding_completed: user.onboarding_completed,
    })
}
