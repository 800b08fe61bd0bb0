//! 收款方式实体定义
//!
//! 银行账户与 UPI 地址由用户自行维护，提现时按 ID 引用。
//! 归属校验（引用的收款方式必须属于发起提现的用户）由提现服务完成。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 银行账户
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_holder: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub bank_name: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// UPI 收款地址
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UpiHandle {
    pub id: Uuid,
    pub user_id: Uuid,
    pub upi_address: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}
