//! 광고주 / 인플루언서 프로필 쿼리
//!
//! 프로필 생성은 onboarding_completed 플래그 전환과 한 트랜잭션으로 묶임.
//! 인플루언서 채널 셋 교체(전체 교체 업데이트)도 마찬가지.

use chrono::NaiveDate;
use sqlx::Result;
use uuid::Uuid;

use super::{AdvertiserProfileRow, Database, InfluencerProfileRow, SnsChannelRow};
use crate::types::SnsChannel;

/// SNS URL 중복 방지 제약 이름
pub const SNS_URL_UNIQUE_CONSTRAINT: &str = "sns_channels_url_key";

/// 광고주 프로필 insert 파라미터
pub struct NewAdvertiserProfile<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub business_name: &'a str,
    /// 정규화된 10자리
    pub business_number: &'a str,
    pub representative_name: Option<&'a str>,
    pub business_category: &'a str,
    pub address: &'a str,
    pub address_detail: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Database {
    // ============ 광고주 ============

    pub async fn find_advertiser_profile_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<AdvertiserProfileRow>> {
        sqlx::query_as::<_, AdvertiserProfileRow>(
            "SELECT * FROM advertiser_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await
    }

    pub async fn business_number_exists(&self, business_number: &str) -> Result<bool> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM advertiser_profiles WHERE business_number = $1",
        )
        .bind(business_number)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.is_some())
    }

    /// 프로필 생성 + 온보딩 플래그 전환 (단일 트랜잭션)
    pub async fn create_advertiser_profile(
        &self,
        user_id: Uuid,
        profile: NewAdvertiserProfile<'_>,
    ) -> Result<AdvertiserProfileRow> {
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query_as::<_, AdvertiserProfileRow>(
            r#"
            INSERT INTO advertiser_profiles (
                user_id, name, phone, business_name, business_number,
                representative_name, business_category, address, address_detail,
                latitude, longitude
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(profile.name)
        .bind(profile.phone)
        .bind(profile.business_name)
        .bind(profile.business_number)
        .bind(profile.representative_name)
        .bind(profile.business_category)
        .bind(profile.address)
        .bind(profile.address_detail)
        .bind(profile.latitude)
        .bind(profile.longitude)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET onboarding_completed = TRUE WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row)
    }

    /// 사업자명 배치 조회 (user_id → business_name)
    ///
    /// 목록 응답의 N+1 조회를 피하기 위한 batch-fetch-then-join 단계
    pub async fn advertiser_business_names(
        &self,
        user_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, String)>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, (Uuid, String)>(
            "SELECT user_id, business_name FROM advertiser_profiles WHERE user_id = ANY($1)",
        )
        .bind(user_ids)
        .fetch_all(self.pool())
        .await
    }

    // ============ 인플루언서 ============

    pub async fn find_influencer_profile_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<InfluencerProfileRow>> {
        sqlx::query_as::<_, InfluencerProfileRow>(
            "SELECT * FROM influencer_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await
    }

    pub async fn list_sns_channels(&self, profile_id: Uuid) -> Result<Vec<SnsChannelRow>> {
        sqlx::query_as::<_, SnsChannelRow>(
            r#"
            SELECT id, profile_id, channel_type, channel_name, url
            FROM sns_channels
            WHERE profile_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(profile_id)
        .fetch_all(self.pool())
        .await
    }

    /// 주어진 URL 중 다른 프로필에 이미 등록된 것을 조회
    ///
    /// `exclude_profile`이 있으면 본인 프로필 소유 URL은 충돌로 치지 않음
    /// (업데이트 경로의 self-conflict 면제)
    pub async fn find_conflicting_sns_urls(
        &self,
        urls: &[String],
        exclude_profile: Option<Uuid>,
    ) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT url FROM sns_channels
            WHERE url = ANY($1)
              AND ($2::uuid IS NULL OR profile_id <> $2)
            "#,
        )
        .bind(urls)
        .bind(exclude_profile)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(|(url,)| url).collect())
    }

    /// 프로필 생성 + 채널 등록 + 온보딩 플래그 전환 (단일 트랜잭션)
    pub async fn create_influencer_profile(
        &self,
        user_id: Uuid,
        name: &str,
        phone: &str,
        birth_date: NaiveDate,
        channels: &[SnsChannel],
    ) -> Result<InfluencerProfileRow> {
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query_as::<_, InfluencerProfileRow>(
            r#"
            INSERT INTO influencer_profiles (user_id, name, phone, birth_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(phone)
        .bind(birth_date)
        .fetch_one(&mut *tx)
        .await?;

        for channel in channels {
            sqlx::query(
                r#"
                INSERT INTO sns_channels (profile_id, channel_type, channel_name, url)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(row.id)
            .bind(channel.channel_type.as_str())
            .bind(&channel.channel_name)
            .bind(&channel.url)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE users SET onboarding_completed = TRUE WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row)
    }

    /// 프로필 전체 교체 업데이트: 필드 갱신 + 채널 셋 delete/insert (단일 트랜잭션)
    pub async fn replace_influencer_profile(
        &self,
        profile_id: Uuid,
        name: &str,
        phone: &str,
        birth_date: NaiveDate,
        channels: &[SnsChannel],
    ) -> Result<InfluencerProfileRow> {
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query_as::<_, InfluencerProfileRow>(
            r#"
            UPDATE influencer_profiles
            SET name = $2, phone = $3, birth_date = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(profile_id)
        .bind(name)
        .bind(phone)
        .bind(birth_date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM sns_channels WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;

        for channel in channels {
            sqlx::query(
                r#"
                INSERT INTO sns_channels (profile_id, channel_type, channel_name, url)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(profile_id)
            .bind(channel.channel_type.as_str())
            .bind(&channel.channel_name)
            .bind(&channel.url)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(row)
    }

    /// 인플루언서 표시 이름 배치 조회 (user_id → name)
    pub async fn influencer_names(&self, user_ids: &[Uuid]) -> Result<Vec<(Uuid, String)>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, (Uuid, String)>(
            "SELECT user_id, name FROM influencer_profiles WHERE user_id = ANY($1)",
        )
        .bind(user_ids)
        .fetch_all(self.pool())
        .await
    }
}
