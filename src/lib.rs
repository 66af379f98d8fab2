//! CampaignHub API Library
//!
//! # Overview
//!
//! 이 라이브러리는 체험단 마켓플레이스(광고주 ↔ 인플루언서)의 백엔드 API를 제공합니다.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                         API                              │
//! │                                                          │
//! │  ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐    │
//! │  │ Routes  │  │Services │  │   DB    │  │  Types  │    │
//! │  └────┬────┘  └────┬────┘  └────┬────┘  └────┬────┘    │
//! │       │            │            │            │          │
//! │       └────────────┴────────────┴────────────┘          │
//! │                         │                                │
//! └─────────────────────────┼────────────────────────────────┘
//!                           │
//!                           ▼
//!                  ┌────────────────┐
//!                  │   PostgreSQL   │
//!                  └────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: 환경 설정 관리
//! - `error`: 에러 타입 및 처리
//! - `routes`: HTTP 엔드포인트 핸들러
//! - `services`: 비즈니스 로직 (인증, 온보딩, 체험단, 지원서)
//! - `db`: 데이터베이스 연동
//! - `types`: 공통 타입 정의
//! - `validators`: 도메인 형식 검증 (사업자번호, SNS URL 등)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use campaignhub_api::{config::Config, db::Database, services::IdentityService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let db = Database::connect(&config.database_url).await?;
//!     let identity = IdentityService::new(&config.jwt_secret, config.token_ttl_secs);
//!
//!     // ... 서버 시작
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod services;
pub mod types;
pub mod validators;

// Re-exports for convenience
pub use config::Config;
pub use db::Database;
pub use error::ApiError;
pub use services::IdentityService;

/// 애플리케이션 전역 상태
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub identity: Arc<IdentityService>,
    pub config: Arc<Config>,
}

// AuthUser extractor가 identity 서비스만 바라볼 수 있도록 substate 제공
impl axum::extract::FromRef<AppState> for Arc<IdentityService> {
    fn from_ref(state: &AppState) -> Self {
        state.identity.clone()
    }
}
