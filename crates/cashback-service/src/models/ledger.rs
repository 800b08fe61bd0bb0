//! 余额流水实体定义

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::LedgerEntryType;

/// 余额流水
///
/// 只增不改。每一次余额变动（核销入账、提现扣减、失败退回）
/// 都与业务写入处于同一事务，balance_after 记录变动后的余额快照，
/// 支持审计追溯。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CashbackLedger {
    pub id: i64,
    pub user_id: Uuid,
    pub entry_type: LedgerEntryType,
    /// 变动金额（入账为正，扣减为负）
    pub amount: Decimal,
    /// 变动后余额快照
    pub balance_after: Decimal,
    /// 关联的凭证或提现请求 ID
    #[sqlx(default)]
    pub ref_id: Option<Uuid>,
    #[sqlx(default)]
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CashbackLedger {
    /// 构造一条未落库的流水记录（id 由数据库生成）
    pub fn entry(
        user_id: Uuid,
        entry_type: LedgerEntryType,
        amount: Decimal,
        balance_after: Decimal,
        ref_id: Option<Uuid>,
        remark: Option<String>,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            entry_type,
            amount,
            balance_after,
            ref_id,
            remark,
            created_at: Utc::now(),
        }
    }
}
