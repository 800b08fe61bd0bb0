//! 购买凭证实体定义

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{TransactionStatus, VerificationMethod};

/// 购买凭证
///
/// 用户声称发生了一笔符合返现条件的购买。返现金额在创建时按商品
/// 比例一次性算定，之后不随商品配置变化。cashback_amount 至多入账
/// 一次，且仅在状态迁移到 Verified 的那次迁移中入账。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    /// 商户侧订单号，webhook 核销按此查找（存在时全局唯一）
    #[sqlx(default)]
    pub external_order_id: Option<String>,
    pub amount: Decimal,
    /// 创建时算定的返现金额
    pub cashback_amount: Decimal,
    pub status: TransactionStatus,
    pub verification_method: VerificationMethod,
    #[sqlx(default)]
    pub verified_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub verification_notes: Option<String>,
    /// 用户上传的凭证截图地址
    #[sqlx(default)]
    pub evidence_url: Option<String>,
    /// 客户端幂等键，重试提交时命中已有凭证而非新建
    #[sqlx(default)]
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_transaction_json_shape() {
        let txn = Transaction {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            external_order_id: Some("ORD-1001".to_string()),
            amount: Decimal::from(100),
            cashback_amount: Decimal::from_str("5.00").unwrap(),
            status: TransactionStatus::Pending,
            verification_method: VerificationMethod::SelfReported,
            verified_at: None,
            verification_notes: None,
            evidence_url: None,
            idempotency_key: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["verificationMethod"], "SELF_REPORTED");
        assert_eq!(json["externalOrderId"], "ORD-1001");
    }
}
