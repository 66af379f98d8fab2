//! API Routes Module
//!
//! 모든 HTTP 엔드포인트 정의
//!
//! # Routes
//! - `/health` - 헬스 체크
//! - `/api/auth/*` - 가입 / 로그인 / 로그아웃 / 현재 사용자
//! - `/api/advertiser/profile`, `/api/influencer/profile` - 역할별 온보딩
//! - `/api/campaigns/*` - 체험단 목록/상세/관리, 지원서 제출/지원자 목록
//! - `/api/my/*` - 내 체험단 / 내 지원 목록
//! - `/api/applications/*` - 선정/거절

pub mod applications;
pub mod auth;
pub mod campaigns;
pub mod health;
pub mod onboarding;
