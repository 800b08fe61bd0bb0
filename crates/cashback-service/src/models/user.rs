//! 用户实体定义

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户
///
/// cashback_balance 只能由核销服务和提现服务修改，
/// 且所有修改都通过条件更新保证不会变为负数
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    /// 密码哈希不出现在任何 API 响应中
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// 可提现返现余额（恒为非负）
    pub cashback_balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// 创建新用户（余额从零开始）
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            cashback_balance: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }
}
