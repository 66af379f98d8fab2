//! Database Module
//!
//! # Interview Q&A
//!
//! Q: 왜 PostgreSQL + SQLx인가?
//! A: 마켓플레이스 백엔드에 적합한 조합
//!
//!    1. ACID 트랜잭션: 프로필 생성 + 온보딩 플래그 전환을 원자적으로 처리
//!    2. 부분 UNIQUE 인덱스: (campaign_id, influencer_id) 중복 지원 레이스를
//!       저장소 레벨에서 차단
//!    3. JSONB: 지원서의 SNS 채널 스냅샷, 체험단 부가 이미지 저장
//!    4. SQLx: async 지원 + 마이그레이션 내장
//!
//! Q: 커넥션 풀은 어떻게 관리하는가?
//! A: SQLx의 PgPool 사용
//!    - 최소/최대 커넥션 수 설정
//!    - 커넥션 재사용 (오버헤드 감소)
//!    - 타임아웃 처리

mod applications;
mod campaigns;
mod models;
mod profiles;
mod users;

pub use applications::APPLICATION_UNIQUE_CONSTRAINT;
pub use campaigns::{CampaignListFilter, CampaignPatch, NewCampaign};
pub use models::*;
pub use profiles::{NewAdvertiserProfile, SNS_URL_UNIQUE_CONSTRAINT};
pub use users::AgreementEntry;

use anyhow::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// 데이터베이스 연결 및 쿼리 담당
///
/// 엔티티별 쿼리는 users / profiles / campaigns / applications 서브모듈의
/// impl 블록으로 분리되어 있음
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 데이터베이스 연결
    ///
    /// # Connection Pool Settings
    ///
    /// - max_connections: 10 (트래픽에 따라 조정)
    /// - min_connections: 1 (idle 시 최소 유지)
    /// - acquire_timeout: 3초 (커넥션 획득 대기)
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(3))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// 마이그레이션 실행
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// unique 제약 위반 여부 확인 (제약 이름으로 도메인 충돌 복원)
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
