//! 商品实体定义

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 商品
///
/// 核销服务只读取 cashback_percent 用于在提交凭证时计算返现金额
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    /// 商户侧商品页地址
    pub merchant_url: String,
    pub category: String,
    /// 返现比例（百分数，如 5.00 表示 5%）
    pub cashback_percent: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// 按购买金额计算返现金额
    ///
    /// cashback = amount × cashback_percent / 100，保留两位小数
    pub fn cashback_for(&self, amount: Decimal) -> Decimal {
        (amount * self.cashback_percent / Decimal::from(100)).round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn product_with_percent(percent: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            title: "Test".to_string(),
            description: "Test product".to_string(),
            price: Decimal::from(100),
            image_url: "https://example.com/p.jpg".to_string(),
            merchant_url: "https://example.com/p".to_string(),
            category: "Electronics".to_string(),
            cashback_percent: Decimal::from_str(percent).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_cashback_exact() {
        // 100 × 5% = 5.00，必须精确
        let product = product_with_percent("5.0");
        assert_eq!(
            product.cashback_for(Decimal::from(100)),
            Decimal::from_str("5.00").unwrap()
        );
    }

    #[test]
    fn test_cashback_rounds_to_two_decimals() {
        // 49.99 × 3.5% = 1.74965 -> 1.75
        let product = product_with_percent("3.5");
        assert_eq!(
            product.cashback_for(Decimal::from_str("49.99").unwrap()),
            Decimal::from_str("1.75").unwrap()
        );
    }
}
