//! 사용자 / 약관 쿼리

use sqlx::Result;
use uuid::Uuid;

use super::{Database, UserRow};

/// 가입 시 저장되는 약관 동의 항목
pub struct AgreementEntry {
    pub agreement_type: &'static str,
    pub agreement_version: &'static str,
}

impl Database {
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, role, onboarding_completed, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await
    }

    pub async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<UserRow>> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, role, onboarding_completed, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await
    }

    /// 사용자 생성 + 약관 동의 내역 저장 (단일 트랜잭션)
    ///
    /// 약관 저장이 실패하면 사용자 행도 함께 롤백됨
    pub async fn create_user_with_agreements(
        &self,
        email: &str,
        password_hash: &str,
        role: &str,
        agreements: &[AgreementEntry],
    ) -> Result<UserRow> {
        let mut tx = self.pool().begin().await?;

        let user = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, password_hash, role, onboarding_completed)
            VALUES ($1, $2, $3, FALSE)
            RETURNING id, email, password_hash, role, onboarding_completed, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&mut *tx)
        .await?;

        for entry in agreements {
            sqlx::query(
                r#"
                INSERT INTO user_agreements (user_id, agreement_type, agreement_version, is_agreed)
                VALUES ($1, $2, $3, TRUE)
                "#,
            )
            .bind(user.id)
            .bind(entry.agreement_type)
            .bind(entry.agreement_version)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(user)
    }
}
