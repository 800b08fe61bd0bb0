//! 提现仓储
//!
//! 提现请求的创建必须与余额扣减同处一个事务，因此创建接口只提供
//! `_in_tx` 形式。状态推进同样采用条件更新。

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::traits::RedemptionRepositoryTrait;
use crate::error::Result;
use crate::models::{RedemptionRequest, RedemptionStatus};

/// 提现仓储
pub struct RedemptionRepository {
    pool: PgPool,
}

impl RedemptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 获取提现请求
    pub async fn get(&self, id: Uuid) -> Result<Option<RedemptionRequest>> {
        let request = sqlx::query_as::<_, RedemptionRequest>(
            r#"
            SELECT id, user_id, amount, method, status, bank_account_id, upi_id,
                   failure_reason, created_at, processed_at
            FROM redemption_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// 列出用户的提现请求（创建时间倒序）
    pub async fn list_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<RedemptionRequest>> {
        let requests = sqlx::query_as::<_, RedemptionRequest>(
            r#"
            SELECT id, user_id, amount, method, status, bank_account_id, upi_id,
                   failure_reason, created_at, processed_at
            FROM redemption_requests
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// 在事务中创建提现请求
    pub async fn create_in_tx(tx: &mut PgConnection, request: &RedemptionRequest) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO redemption_requests (id, user_id, amount, method, status,
                                             bank_account_id, upi_id, failure_reason,
                                             created_at, processed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(request.id)
        .bind(request.user_id)
        .bind(request.amount)
        .bind(request.method)
        .bind(request.status)
        .bind(request.bank_account_id)
        .bind(request.upi_id)
        .bind(&request.failure_reason)
        .bind(request.created_at)
        .bind(request.processed_at)
        .execute(tx)
        .await?;

        Ok(())
    }

    /// 条件推进提现状态
    ///
    /// 只有当前状态等于 expected 时更新才命中，返回命中行数
    pub async fn advance_status(
        &self,
        id: Uuid,
        expected: RedemptionStatus,
        new_status: RedemptionStatus,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE redemption_requests
            SET status = $2, processed_at = $3
            WHERE id = $1 AND status = $4
            "#,
        )
        .bind(id)
        .bind(new_status)
        .bind(Utc::now())
        .bind(expected)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// 在事务中将 Pending/Processing 的请求标记为失败
    ///
    /// 返回 0 行表示请求不存在或已处于终态，调用方不得退款
    pub async fn mark_failed_in_tx(
        tx: &mut PgConnection,
        id: Uuid,
        failure_reason: &str,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE redemption_requests
            SET status = $2, failure_reason = $3, processed_at = $4
            WHERE id = $1 AND status IN ($5, $6)
            "#,
        )
        .bind(id)
        .bind(RedemptionStatus::Failed)
        .bind(failure_reason)
        .bind(Utc::now())
        .bind(RedemptionStatus::Pending)
        .bind(RedemptionStatus::Processing)
        .execute(tx)
        .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RedemptionRepositoryTrait for RedemptionRepository {
    async fn get_redemption(&self, id: Uuid) -> Result<Option<RedemptionRequest>> {
        self.get(id).await
    }

    async fn list_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<RedemptionRequest>> {
        self.list_by_user(user_id, limit).await
    }
}
