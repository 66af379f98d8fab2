//! Identity Service
//!
//! Bearer 토큰 발급/검증과 비밀번호 해싱을 담당하는 인증 게이트웨이.
//!
//! # Design Decision
//!
//! - HS256 JWT: 단일 서버 구성에서 대칭키로 충분, 세션 저장소 불필요
//! - 로그아웃은 stateless (클라이언트가 토큰 폐기, 만료로 자연 무효화)
//! - 비밀번호는 사용자별 랜덤 salt + SHA-256 다이제스트로 저장

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::ApiError;

/// JWT 클레임
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// 사용자 id
    sub: String,
    /// 만료 시각 (unix seconds)
    exp: i64,
    /// 발급 시각
    iat: i64,
}

/// 토큰 발급/검증 + 비밀번호 해싱
pub struct IdentityService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_secs: i64,
}

impl IdentityService {
    pub fn new(secret: &str, token_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl_secs,
        }
    }

    /// 로그인 성공 시 bearer 토큰 발급
    pub fn issue_token(&self, user_id: Uuid) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + self.token_ttl_secs,
            iat: now,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|err| {
            tracing::error!("Token encoding failed: {:?}", err);
            ApiError::Internal
        })
    }

    /// 토큰 검증 → 사용자 id 복원
    ///
    /// 서명 불일치 / 만료 / 형식 오류는 모두 401로 수렴
    pub fn verify_token(&self, token: &str) -> Result<Uuid, ApiError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| ApiError::Unauthorized)?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| ApiError::Unauthorized)
    }

    /// 비밀번호 해시 생성: "hex(salt)$hex(sha256(salt || password))"
    pub fn hash_password(&self, password: &str) -> String {
        let salt: [u8; 16] = rand::random();
        let digest = Self::digest_with_salt(&salt, password);
        format!("{}${}", hex::encode(salt), hex::encode(digest))
    }

    /// 저장된 해시와 입력 비밀번호 대조
    pub fn verify_password(&self, password: &str, stored: &str) -> bool {
        let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
            return false;
        };
        let Ok(salt) = hex::decode(salt_hex) else {
            return false;
        };
        hex::encode(Self::digest_with_salt(&salt, password)) == digest_hex
    }

    fn digest_with_salt(salt: &[u8], password: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        hasher.finalize().into()
    }
}

/// 인증된 사용자 extractor
///
/// Authorization: Bearer <token> 헤더를 검증하고 사용자 id를 핸들러에 주입.
/// 헤더 누락 / 비정상 토큰은 일괄 401 응답.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    Arc<IdentityService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        let identity = Arc::<IdentityService>::from_ref(state);
        let user_id = identity.verify_token(token)?;

        Ok(AuthUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let identity = IdentityService::new("test-secret", 3600);
        let user_id = Uuid::new_v4();

        let token = identity.issue_token(user_id).unwrap();
        assert_eq!(identity.verify_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let identity = IdentityService::new("test-secret", 3600);
        let token = identity.issue_token(Uuid::new_v4()).unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(identity.verify_token(&tampered).is_err());

        // 다른 시크릿으로 서명된 토큰
        let other = IdentityService::new("other-secret", 3600);
        let foreign = other.issue_token(Uuid::new_v4()).unwrap();
        assert!(identity.verify_token(&foreign).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // 기본 leeway(60초)보다 과거로 만료된 토큰
        let identity = IdentityService::new("test-secret", -300);
        let token = identity.issue_token(Uuid::new_v4()).unwrap();
        assert!(identity.verify_token(&token).is_err());
    }

    #[test]
    fn test_password_hash_verify() {
        let identity = IdentityService::new("test-secret", 3600);
        let hash = identity.hash_password("abcd123!");

        assert!(identity.verify_password("abcd123!", &hash));
        assert!(!identity.verify_password("wrong-pass1!", &hash));

        // salt가 달라 동일 비밀번호라도 해시는 매번 다름
        let hash2 = identity.hash_password("abcd123!");
        assert_ne!(hash, hash2);
    }

    #[tokio::test]
    async fn test_auth_extractor_accepts_bearer_header() {
        let identity = Arc::new(IdentityService::new("test-secret", 3600));
        let user_id = Uuid::new_v4();
        let token = identity.issue_token(user_id).unwrap();

        let request = axum::http::Request::builder()
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let user = AuthUser::from_request_parts(&mut parts, &identity)
            .await
            .unwrap();
        assert_eq!(user.user_id, user_id);
    }

    #[tokio::test]
    async fn test_auth_extractor_rejects_bad_header() {
        let identity = Arc::new(IdentityService::new("test-secret", 3600));
        let token = identity.issue_token(Uuid::new_v4()).unwrap();

        // 헤더 누락 / Bearer 접두사 누락 모두 401로 수렴
        for request in [
            axum::http::Request::builder().body(()).unwrap(),
            axum::http::Request::builder()
                .header(AUTHORIZATION, token)
                .body(())
                .unwrap(),
        ] {
            let (mut parts, _) = request.into_parts();
            let err = AuthUser::from_request_parts(&mut parts, &identity)
                .await
                .unwrap_err();
            assert_eq!(err.code(), "UNAUTHORIZED");
        }
    }

    #[test]
    fn test_malformed_stored_hash() {
        let identity = IdentityService::new("test-secret", 3600);
        assert!(!identity.verify_password("abcd123!", "no-dollar-sign"));
        assert!(!identity.verify_password("abcd123!", "zzzz$not-hex"));
    }
}
