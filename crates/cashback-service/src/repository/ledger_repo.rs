//! 余额流水仓储
//!
//! 流水与触发它的余额变动同事务写入，因此写接口只有 `_in_tx` 形式

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row};
use uuid::Uuid;

use super::traits::LedgerRepositoryTrait;
use crate::error::Result;
use crate::models::CashbackLedger;

/// 余额流水仓储
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 列出用户的流水记录（创建时间倒序）
    pub async fn list_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<CashbackLedger>> {
        let entries = sqlx::query_as::<_, CashbackLedger>(
            r#"
            SELECT id, user_id, entry_type, amount, balance_after, ref_id, remark, created_at
            FROM cashback_ledger
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// 在事务中写入一条流水
    ///
    /// 返回新记录的 ID
    pub async fn create_in_tx(tx: &mut PgConnection, entry: &CashbackLedger) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO cashback_ledger (user_id, entry_type, amount, balance_after,
                                         ref_id, remark, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.entry_type)
        .bind(entry.amount)
        .bind(entry.balance_after)
        .bind(entry.ref_id)
        .bind(&entry.remark)
        .bind(entry.created_at)
        .fetch_one(tx)
        .await?;

        Ok(row.get("id"))
    }
}

#[async_trait]
impl LedgerRepositoryTrait for LedgerRepository {
    async fn list_entries_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<CashbackLedger>> {
        self.list_by_user(user_id, limit).await
    }
}
