//! CampaignHub API Server
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Client (Frontend)                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum Web Server                         │
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                      Routes Layer                        ││
//! │  │  /health  /auth/*  /campaigns/*  /applications/*        ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                    Services Layer                        ││
//! │  │  Auth    Onboarding    Campaigns    Applications        ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                    Data Layer                            ││
//! │  │  PostgreSQL (sqlx)                                      ││
//! │  └─────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// 라이브러리에서 가져오기
use campaignhub_api::{routes, AppState, Config, Database, IdentityService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    // RUST_LOG=debug,sqlx=warn 형태로 레벨 제어 가능
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "campaignhub_api=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting CampaignHub API Server");

    // 설정 로드
    let config = Config::from_env()?;
    tracing::info!("📋 Configuration loaded");

    // 데이터베이스 연결
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("🗄️  Database connected");

    // 마이그레이션 실행
    db.run_migrations().await?;
    tracing::info!("📦 Migrations completed");

    // 인증 서비스 초기화
    let identity = IdentityService::new(&config.jwt_secret, config.token_ttl_secs);
    tracing::info!("🔐 Identity service initialized");

    // 앱 상태 구성
    let state = AppState {
        db: Arc::new(db),
        identity: Arc::new(identity),
        config: Arc::new(config.clone()),
    };

    // 라우터 구성
    let app = create_router(state);

    // 서버 시작
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🌐 Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// 라우터 생성
///
/// # Route Structure
///
/// ```text
/// GET    /health                          - 서버 상태 확인
///
/// POST   /api/auth/signup                 - 회원가입
/// POST   /api/auth/login                  - 로그인
/// GET    /api/auth/me                     - 현재 사용자
/// POST   /api/auth/logout                 - 로그아웃 (stateless)
///
/// POST   /api/advertiser/profile          - 광고주 프로필 생성
/// POST   /api/influencer/profile          - 인플루언서 프로필 생성
/// GET    /api/influencer/profile          - 인플루언서 프로필 조회
/// PATCH  /api/influencer/profile          - 인플루언서 프로필 수정
///
/// GET    /api/campaigns                   - 공개 체험단 목록
/// POST   /api/campaigns                   - 체험단 생성
/// GET    /api/campaigns/:id               - 체험단 상세
/// PATCH  /api/campaigns/:id               - 체험단 수정
/// DELETE /api/campaigns/:id               - 체험단 삭제 (soft)
/// POST   /api/campaigns/:id/close         - 모집 조기 종료
/// GET    /api/my/campaigns                - 내 체험단 목록 (광고주)
///
/// POST   /api/campaigns/:id/applications  - 지원서 제출
/// GET    /api/campaigns/:id/applicants    - 지원자 목록 (광고주)
/// GET    /api/my/applications             - 내 지원 목록 (인플루언서)
/// PATCH  /api/applications/:id/status     - 선정/거절
/// ```
fn create_router(state: AppState) -> Router {
    // CORS 설정
    // 프로덕션에서는 특정 도메인만 허용
    // 개발 환경에서는 localhost 허용
    let cors = if state.config.is_production() {
        // 프로덕션: 특정 도메인만 허용 (환경변수로 설정)
        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "https://yourdomain.com".to_string());
        let origins: Vec<_> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PATCH,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
            ])
    } else {
        // 개발: localhost 허용
        CorsLayer::new()
            .allow_origin([
                "http://localhost:5173".parse().unwrap(),  // Vite dev server
                "http://localhost:3000".parse().unwrap(),  // Next.js dev server
                "http://127.0.0.1:5173".parse().unwrap(),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api = Router::new()
        // Auth
        .route("/auth/signup", post(routes::auth::signup))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/me", get(routes::auth::current_user))
        .route("/auth/logout", post(routes::auth::logout))

        // Onboarding / Profile
        .route("/advertiser/profile", post(routes::onboarding::create_advertiser_profile))
        .route(
            "/influencer/profile",
            post(routes::onboarding::create_influencer_profile)
                .get(routes::onboarding::get_influencer_profile)
                .patch(routes::onboarding::update_influencer_profile),
        )

        // Campaigns
        .route(
            "/campaigns",
            get(routes::campaigns::list_campaigns).post(routes::campaigns::create_campaign),
        )
        .route(
            "/campaigns/:id",
            get(routes::campaigns::get_campaign)
                .patch(routes::campaigns::update_campaign)
                .delete(routes::campaigns::delete_campaign),
        )
        .route("/campaigns/:id/close", post(routes::campaigns::close_recruitment))
        .route("/my/campaigns", get(routes::campaigns::list_advertiser_campaigns))

        // Applications
        .route("/campaigns/:id/applications", post(routes::applications::submit_application))
        .route("/campaigns/:id/applicants", get(routes::applications::list_campaign_applicants))
        .route("/my/applications", get(routes::applications::list_my_applications))
        .route("/applications/:id/status", patch(routes::applications::decide_application));

    Router::new()
        // Health check
        .route("/health", get(routes::health::health_check))
        .nest("/api", api)

        // 미들웨어
        .layer(TraceLayer::new_for_http())
        .layer(cors)

        // 상태 주입
        .with_state(state)
}
