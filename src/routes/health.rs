//! Health Check Endpoint
//!
//! 로드밸런서/K8s probe가 바라보는 단일 엔드포인트.
//! 프로세스 생존이 아니라 "체험단 API를 실제로 서비스할 수 있는가"를
//! 보고해야 하므로 DB ping까지 포함하고, DB가 내려가 있으면
//! 503으로 응답해 트래픽이 빠지도록 함.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    /// DB ping 왕복 시간. 연결 실패 시 None
    pub db_latency_ms: Option<u64>,
    pub checked_at: String,
}

impl HealthReport {
    fn new(db_latency_ms: Option<u64>) -> Self {
        Self {
            status: if db_latency_ms.is_some() {
                "ok"
            } else {
                "degraded"
            },
            version: env!("CARGO_PKG_VERSION"),
            db_latency_ms,
            checked_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn status_code(&self) -> StatusCode {
        if self.db_latency_ms.is_some() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let started = std::time::Instant::now();
    let latency = match state.db.health_check().await {
        Ok(()) => Some(started.elapsed().as_millis() as u64),
        Err(err) => {
            tracing::warn!("Health check DB ping failed: {:?}", err);
            None
        }
    };

    let report = HealthReport::new(latency);
    (report.status_code(), Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_reflects_db_state() {
        let healthy = HealthReport::new(Some(3));
        assert_eq!(healthy.status, "ok");
        assert_eq!(healthy.status_code(), StatusCode::OK);

        let degraded = HealthReport::new(None);
        assert_eq!(degraded.status, "degraded");
        assert!(degraded.db_latency_ms.is_none());
        assert_eq!(degraded.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
