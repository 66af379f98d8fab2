//! 체험단 쿼리
//!
//! 목록 조회는 필터 조합이 많아 QueryBuilder로 동적 구성.
//! count 쿼리와 페이지 쿼리가 같은 WHERE 절을 공유함.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Postgres, QueryBuilder, Result};
use uuid::Uuid;

use super::{CampaignRow, Database};
use crate::types::CampaignSort;

/// 공개 목록 필터
pub struct CampaignListFilter<'a> {
    pub status: &'a str,
    pub category: Option<&'a str>,
    pub region: Option<&'a str>,
    /// 서비스 레이어에서 2자 미만은 이미 걸러진 상태
    pub search: Option<&'a str>,
    /// end_date가 이 날짜보다 과거인 캠페인 숨김 (기본 목록에서 만료 제외)
    pub hide_expired_before: Option<NaiveDate>,
    pub sort: CampaignSort,
    pub limit: i64,
    pub offset: i64,
}

/// 체험단 insert 파라미터
pub struct NewCampaign<'a> {
    pub advertiser_id: Uuid,
    pub advertiser_profile_id: Uuid,
    pub title: &'a str,
    pub thumbnail_url: &'a str,
    pub benefits: &'a str,
    pub missions: &'a str,
    pub notes: Option<&'a str>,
    pub additional_images: Option<&'a serde_json::Value>,
    pub store_info: Option<&'a serde_json::Value>,
    pub category: &'a str,
    pub region: Option<&'a str>,
    pub total_recruits: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// 부분 업데이트 패치
///
/// 바깥 Option: 필드 포함 여부, 안쪽 Option: NULL로 지우기
#[derive(Default)]
pub struct CampaignPatch {
    pub title: Option<String>,
    pub thumbnail_url: Option<Option<String>>,
    pub benefits: Option<String>,
    pub missions: Option<String>,
    pub notes: Option<Option<String>>,
    pub additional_images: Option<Option<serde_json::Value>>,
    pub store_info: Option<Option<serde_json::Value>>,
    pub category: Option<String>,
    pub region: Option<Option<String>>,
    pub total_recruits: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
}

fn push_list_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &CampaignListFilter<'_>) {
    qb.push(" WHERE deleted_at IS NULL AND status = ");
    qb.push_bind(filter.status.to_string());

    if let Some(category) = filter.category {
        qb.push(" AND category = ");
        qb.push_bind(category.to_string());
    }
    if let Some(region) = filter.region {
        qb.push(" AND region = ");
        qb.push_bind(region.to_string());
    }
    if let Some(search) = filter.search {
        let pattern = format!("%{}%", search);
        qb.push(" AND (title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR benefits ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
    if let Some(today) = filter.hide_expired_before {
        qb.push(" AND end_date >= ");
        qb.push_bind(today);
    }
}

impl Database {
    /// 공개 목록 조회 (행들, 전체 개수)
    pub async fn list_campaigns(
        &self,
        filter: &CampaignListFilter<'_>,
    ) -> Result<(Vec<CampaignRow>, i64)> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM campaigns");
        push_list_filters(&mut count_qb, filter);
        let (total,): (i64,) = count_qb.build_query_as().fetch_one(self.pool()).await?;

        let mut qb = QueryBuilder::new("SELECT * FROM campaigns");
        push_list_filters(&mut qb, filter);
        qb.push(match filter.sort {
            CampaignSort::Latest => " ORDER BY created_at DESC",
            CampaignSort::Deadline => " ORDER BY end_date ASC",
            CampaignSort::Popular => " ORDER BY view_count DESC NULLS LAST",
        });
        qb.push(" LIMIT ");
        qb.push_bind(filter.limit);
        qb.push(" OFFSET ");
        qb.push_bind(filter.offset);

        let rows = qb.build_query_as::<CampaignRow>().fetch_all(self.pool()).await?;

        Ok((rows, total))
    }

    /// 광고주 본인 소유 목록 (만료 제외 없음)
    pub async fn list_advertiser_campaigns(
        &self,
        advertiser_id: Uuid,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<CampaignRow>, i64)> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM campaigns
            WHERE advertiser_id = $1
              AND deleted_at IS NULL
              AND ($2::text IS NULL OR status = $2)
            "#,
        )
        .bind(advertiser_id)
        .bind(status)
        .fetch_one(self.pool())
        .await?;

        let rows = sqlx::query_as::<_, CampaignRow>(
            r#"
            SELECT * FROM campaigns
            WHERE advertiser_id = $1
              AND deleted_at IS NULL
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(advertiser_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await?;

        Ok((rows, total))
    }

    /// 단건 조회 (소프트 삭제 제외)
    pub async fn find_campaign(&self, campaign_id: Uuid) -> Result<Option<CampaignRow>> {
        sqlx::query_as::<_, CampaignRow>(
            "SELECT * FROM campaigns WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(campaign_id)
        .fetch_optional(self.pool())
        .await
    }

    /// 조회수 증가 (상세 조회의 best-effort 부수 효과)
    pub async fn increment_view_count(&self, campaign_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE campaigns SET view_count = view_count + 1 WHERE id = $1")
            .bind(campaign_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    pub async fn insert_campaign(
        &self,
        campaign: NewCampaign<'_>,
    ) -> Result<(Uuid, DateTime<Utc>)> {
        sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
            r#"
            INSERT INTO campaigns (
                advertiser_id, advertiser_profile_id, title, thumbnail_url,
                benefits, missions, notes, additional_images, store_info,
                category, region, total_recruits, start_date, end_date,
                status, view_count, latitude, longitude
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    'recruiting', 0, $15, $16)
            RETURNING id, created_at
            "#,
        )
        .bind(campaign.advertiser_id)
        .bind(campaign.advertiser_profile_id)
        .bind(campaign.title)
        .bind(campaign.thumbnail_url)
        .bind(campaign.benefits)
        .bind(campaign.missions)
        .bind(campaign.notes)
        .bind(campaign.additional_images)
        .bind(campaign.store_info)
        .bind(campaign.category)
        .bind(campaign.region)
        .bind(campaign.total_recruits)
        .bind(campaign.start_date)
        .bind(campaign.end_date)
        .bind(campaign.latitude)
        .bind(campaign.longitude)
        .fetch_one(self.pool())
        .await
    }

    /// 포함된 필드만 갱신. 패치가 비어 있으면 아무것도 하지 않음
    pub async fn update_campaign(&self, campaign_id: Uuid, patch: CampaignPatch) -> Result<()> {
        let mut qb = QueryBuilder::new("UPDATE campaigns SET ");
        let mut set = qb.separated(", ");
        let mut dirty = false;

        macro_rules! set_field {
            ($field:ident, $column:literal) => {
                if let Some(value) = patch.$field {
                    set.push(concat!($column, " = "));
                    set.push_bind_unseparated(value);
                    dirty = true;
                }
            };
        }

        set_field!(title, "title");
        set_field!(thumbnail_url, "thumbnail_url");
        set_field!(benefits, "benefits");
        set_field!(missions, "missions");
        set_field!(notes, "notes");
        set_field!(additional_images, "additional_images");
        set_field!(store_info, "store_info");
        set_field!(category, "category");
        set_field!(region, "region");
        set_field!(total_recruits, "total_recruits");
        set_field!(start_date, "start_date");
        set_field!(end_date, "end_date");
        set_field!(latitude, "latitude");
        set_field!(longitude, "longitude");

        if !dirty {
            return Ok(());
        }

        qb.push(" WHERE id = ");
        qb.push_bind(campaign_id);
        qb.build().execute(self.pool()).await?;
        Ok(())
    }

    /// 소프트 삭제 (지원서에는 전파하지 않음)
    pub async fn soft_delete_campaign(&self, campaign_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE campaigns SET deleted_at = NOW() WHERE id = $1")
            .bind(campaign_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// 모집 조기 종료: recruiting → in_progress
    pub async fn close_campaign(&self, campaign_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE campaigns SET status = 'in_progress' WHERE id = $1")
            .bind(campaign_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// 캠페인별 지원자 수 배치 조회 (상태 무관)
    pub async fn count_applicants_for(
        &self,
        campaign_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, i64)>> {
        if campaign_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT campaign_id, COUNT(*)
            FROM applications
            WHERE campaign_id = ANY($1) AND deleted_at IS NULL
            GROUP BY campaign_id
            "#,
        )
        .bind(campaign_ids)
        .fetch_all(self.pool())
        .await
    }

    /// 단일 캠페인 지원자 수 (상태 무관)
    pub async fn count_applicants(&self, campaign_id: Uuid) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM applications WHERE campaign_id = $1 AND deleted_at IS NULL",
        )
        .bind(campaign_id)
        .fetch_one(self.pool())
        .await?;
        Ok(count)
    }
}
