//! 购买凭证仓储
//!
//! 状态迁移通过条件更新实现：UPDATE 的谓词里带上 status = 'pending'，
//! 并发核销同一凭证时只有一个更新命中，入账因此至多发生一次。

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::traits::TransactionRepositoryTrait;
use crate::error::Result;
use crate::models::{Transaction, TransactionStatus, VerificationMethod};

/// 购买凭证仓储
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 创建凭证（Pending 状态）
    pub async fn create(&self, transaction: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, user_id, product_id, external_order_id, amount,
                                      cashback_amount, status, verification_method, verified_at,
                                      verification_notes, evidence_url, idempotency_key, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(transaction.id)
        .bind(transaction.user_id)
        .bind(transaction.product_id)
        .bind(&transaction.external_order_id)
        .bind(transaction.amount)
        .bind(transaction.cashback_amount)
        .bind(transaction.status)
        .bind(transaction.verification_method)
        .bind(transaction.verified_at)
        .bind(&transaction.verification_notes)
        .bind(&transaction.evidence_url)
        .bind(&transaction.idempotency_key)
        .bind(transaction.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// 获取凭证
    pub async fn get(&self, id: Uuid) -> Result<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, product_id, external_order_id, amount, cashback_amount,
                   status, verification_method, verified_at, verification_notes,
                   evidence_url, idempotency_key, created_at
            FROM transactions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// 按外部订单号获取凭证（webhook 核销入口）
    pub async fn get_by_order_id(&self, external_order_id: &str) -> Result<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, product_id, external_order_id, amount, cashback_amount,
                   status, verification_method, verified_at, verification_notes,
                   evidence_url, idempotency_key, created_at
            FROM transactions
            WHERE external_order_id = $1
            "#,
        )
        .bind(external_order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// 按幂等键获取凭证
    ///
    /// 用于防止重试提交创建重复凭证
    pub async fn get_by_idempotency_key(
        &self,
        user_id: Uuid,
        idempotency_key: &str,
    ) -> Result<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, product_id, external_order_id, amount, cashback_amount,
                   status, verification_method, verified_at, verification_notes,
                   evidence_url, idempotency_key, created_at
            FROM transactions
            WHERE user_id = $1 AND idempotency_key = $2
            "#,
        )
        .bind(user_id)
        .bind(idempotency_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// 列出用户的凭证
    pub async fn list_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, product_id, external_order_id, amount, cashback_amount,
                   status, verification_method, verified_at, verification_notes,
                   evidence_url, idempotency_key, created_at
            FROM transactions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// 在事务中将 Pending 凭证迁移到终态
    ///
    /// 谓词中的 status = 'pending' 是并发安全的关键：返回 0 行
    /// 表示凭证不存在或已被其他请求处理，调用方据此决定入账与否。
    pub async fn decide_in_tx(
        tx: &mut PgConnection,
        id: Uuid,
        new_status: TransactionStatus,
        method: VerificationMethod,
        notes: Option<&str>,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = $2, verification_method = $3, verified_at = $4, verification_notes = $5
            WHERE id = $1 AND status = $6
            "#,
        )
        .bind(id)
        .bind(new_status)
        .bind(method)
        .bind(Utc::now())
        .bind(notes)
        .bind(TransactionStatus::Pending)
        .execute(tx)
        .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    async fn create_transaction(&self, transaction: &Transaction) -> Result<()> {
        self.create(transaction).await
    }

    async fn get_transaction(&self, id: Uuid) -> Result<Option<Transaction>> {
        self.get(id).await
    }

    async fn get_by_order_id(&self, external_order_id: &str) -> Result<Option<Transaction>> {
        self.get_by_order_id(external_order_id).await
    }

    async fn get_by_idempotency_key(
        &self,
        user_id: Uuid,
        idempotency_key: &str,
    ) -> Result<Option<Transaction>> {
        self.get_by_idempotency_key(user_id, idempotency_key).await
    }

    async fn list_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Transaction>> {
        self.list_by_user(user_id, limit).await
    }
}
