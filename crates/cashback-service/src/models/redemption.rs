//! 提现相关实体定义

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{RedemptionMethod, RedemptionStatus};

/// 提现请求
///
/// 创建时余额已原子扣减（资金预留），不存在余额仍显示已承诺资金的窗口。
/// 打款失败时扣减金额退回余额并记录 failure_reason。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub method: RedemptionMethod,
    pub status: RedemptionStatus,
    /// method = BankTransfer 时必填
    #[sqlx(default)]
    pub bank_account_id: Option<Uuid>,
    /// method = Upi 时必填
    #[sqlx(default)]
    pub upi_id: Option<Uuid>,
    #[sqlx(default)]
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    #[sqlx(default)]
    pub processed_at: Option<DateTime<Utc>>,
}

impl RedemptionRequest {
    /// 创建一条待处理的提现请求
    pub fn new(
        user_id: Uuid,
        amount: Decimal,
        method: RedemptionMethod,
        bank_account_id: Option<Uuid>,
        upi_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            method,
            status: RedemptionStatus::Pending,
            bank_account_id,
            upi_id,
            failure_reason: None,
            created_at: Utc::now(),
            processed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request_is_pending() {
        let req = RedemptionRequest::new(
            Uuid::new_v4(),
            Decimal::from(50),
            RedemptionMethod::Upi,
            None,
            Some(Uuid::new_v4()),
        );
        assert_eq!(req.status, RedemptionStatus::Pending);
        assert!(req.processed_at.is_none());
        assert!(req.failure_reason.is_none());
    }
}
