//! Services Module
//!
//! 비즈니스 로직 레이어. 라우트 핸들러는 요청을 역직렬화해 넘기기만 하고,
//! 검증/게이트/트랜잭션 경계는 전부 여기서 결정됨.
//!
//! - auth: 가입 / 로그인 / 현재 사용자
//! - identity: 토큰 발급·검증, 비밀번호 해싱, AuthUser extractor
//! - onboarding: 역할별 프로필 생성과 인플루언서 프로필 관리
//! - campaigns: 체험단 수명주기 (목록/상세/생성/수정/삭제/모집 종료)
//! - applications: 지원 파이프라인과 선정/거절 워크플로

pub mod applications;
pub mod auth;
pub mod campaigns;
pub mod identity;
pub mod onboarding;

pub use identity::{AuthUser, IdentityService};
