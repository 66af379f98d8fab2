//! 지원서 쿼리
//!
//! 제출은 조건부 insert로 정원 초과를 원자적으로 차단하고,
//! (campaign_id, influencer_id) 부분 UNIQUE 인덱스가 중복 제출 레이스를 막음.

use chrono::NaiveDate;
use sqlx::Result;
use uuid::Uuid;

use super::{ApplicationDecisionRow, ApplicationRow, ApplicationWithCampaignRow, Database};

/// 중복 지원 방지 인덱스 이름 (migrations/0001_init.sql)
pub const APPLICATION_UNIQUE_CONSTRAINT: &str = "ux_applications_campaign_influencer";

impl Database {
    /// (campaign, influencer)의 살아있는 지원서 존재 여부
    pub async fn has_live_application(
        &self,
        campaign_id: Uuid,
        influencer_id: Uuid,
    ) -> Result<bool> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM applications
            WHERE campaign_id = $1 AND influencer_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(campaign_id)
        .bind(influencer_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.is_some())
    }

    /// 정원 검사가 내장된 조건부 insert
    ///
    /// 현재 지원자 수가 total_recruits 미만일 때만 행이 생성됨.
    /// `None` 반환은 insert 시점에 정원이 찼다는 뜻.
    /// 중복 지원은 unique 위반 에러로 올라오며 서비스 레이어에서 재분류함.
    pub async fn insert_application_guarded(
        &self,
        campaign_id: Uuid,
        influencer_id: Uuid,
        message: &str,
        visit_date: NaiveDate,
        selected_sns_channel: &serde_json::Value,
        total_recruits: i32,
    ) -> Result<Option<ApplicationRow>> {
        sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications (
                campaign_id, influencer_id, message, visit_date,
                selected_sns_channel, status
            )
            SELECT $1, $2, $3, $4, $5, 'pending'
            WHERE (
                SELECT COUNT(*) FROM applications
                WHERE campaign_id = $1 AND deleted_at IS NULL
            ) < $6
            RETURNING *
            "#,
        )
        .bind(campaign_id)
        .bind(influencer_id)
        .bind(message)
        .bind(visit_date)
        .bind(selected_sns_channel)
        .bind(total_recruits)
        .fetch_optional(self.pool())
        .await
    }

    /// 인플루언서 본인의 지원 목록 (체험단 요약 조인 포함)
    pub async fn list_my_applications(
        &self,
        influencer_id: Uuid,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ApplicationWithCampaignRow>, i64)> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM applications a
            WHERE a.influencer_id = $1
              AND a.deleted_at IS NULL
              AND ($2::text IS NULL OR a.status = $2)
            "#,
        )
        .bind(influencer_id)
        .bind(status)
        .fetch_one(self.pool())
        .await?;

        let rows = sqlx::query_as::<_, ApplicationWithCampaignRow>(
            r#"
            SELECT
                a.id,
                a.campaign_id,
                a.message,
                a.visit_date,
                a.selected_sns_channel,
                a.status,
                a.created_at,
                c.title         AS campaign_title,
                c.thumbnail_url AS campaign_thumbnail,
                c.category      AS campaign_category,
                c.start_date    AS campaign_start_date,
                c.end_date      AS campaign_end_date,
                c.deleted_at    AS campaign_deleted_at,
                c.advertiser_id AS campaign_advertiser_id
            FROM applications a
            JOIN campaigns c ON c.id = a.campaign_id
            WHERE a.influencer_id = $1
              AND a.deleted_at IS NULL
              AND ($2::text IS NULL OR a.status = $2)
            ORDER BY a.created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(influencer_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await?;

        Ok((rows, total))
    }

    /// 특정 캠페인의 지원자 목록 (광고주 뷰)
    pub async fn list_campaign_applicants(
        &self,
        campaign_id: Uuid,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ApplicationRow>, i64)> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM applications
            WHERE campaign_id = $1
              AND deleted_at IS NULL
              AND ($2::text IS NULL OR status = $2)
            "#,
        )
        .bind(campaign_id)
        .bind(status)
        .fetch_one(self.pool())
        .await?;

        let rows = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT * FROM applications
            WHERE campaign_id = $1
              AND deleted_at IS NULL
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(campaign_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await?;

        Ok((rows, total))
    }

    /// 상태 변경 게이트용: 지원서 + 상위 캠페인의 소유자/상태
    pub async fn find_application_for_decision(
        &self,
        application_id: Uuid,
    ) -> Result<Option<ApplicationDecisionRow>> {
        sqlx::query_as::<_, ApplicationDecisionRow>(
            r#"
            SELECT
                a.id,
                a.campaign_id,
                c.advertiser_id AS campaign_advertiser_id,
                c.status        AS campaign_status
            FROM applications a
            JOIN campaigns c ON c.id = a.campaign_id
            WHERE a.id = $1 AND a.deleted_at IS NULL
            "#,
        )
        .bind(application_id)
        .fetch_optional(self.pool())
        .await
    }

    /// 게이트 통과 후 무조건 기록 (pending 여부 재검사 없음 — 원 설계 유지)
    pub async fn update_application_status(
        &self,
        application_id: Uuid,
        status: &str,
    ) -> Result<()> {
        sqlx::query("UPDATE applications SET status = $2 WHERE id = $1")
            .bind(application_id)
            .bind(status)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
