//! 返现服务枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx）和 JSON（serde）序列化

use serde::{Deserialize, Serialize};

/// 购买凭证状态
///
/// Pending 是唯一可迁移状态，Verified / Rejected 均为终态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum TransactionStatus {
    /// 待核销 - 用户已提交，等待 webhook 或人工确认
    #[default]
    Pending,
    /// 已核销 - 购买确认，返现已入账（终态）
    Verified,
    /// 已驳回 - 凭证无效，无余额变动（终态）
    Rejected,
}

impl TransactionStatus {
    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Verified | Self::Rejected)
    }
}

/// 核销方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum VerificationMethod {
    /// 联盟回调 - 由商户侧 webhook 自动确认
    Webhook,
    /// 人工核销 - 运营人员审核确认
    Manual,
    /// 用户自报 - 提交时的初始方式
    #[default]
    SelfReported,
}

/// 提现方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum RedemptionMethod {
    /// 银行转账
    BankTransfer,
    /// UPI 转账
    Upi,
}

/// 提现请求状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum RedemptionStatus {
    /// 待处理 - 余额已扣减，等待下游打款
    #[default]
    Pending,
    /// 处理中 - 下游打款进行中
    Processing,
    /// 已完成 - 打款成功（终态）
    Completed,
    /// 已失败 - 打款失败，余额已退回（终态）
    Failed,
}

impl RedemptionStatus {
    /// 是否允许进入打款流程
    pub fn can_process(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// 是否允许标记失败（失败时退回余额）
    pub fn can_fail(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }
}

/// 余额流水类型
///
/// 采用复式记账思想，记录余额的每一次变动
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum LedgerEntryType {
    /// 核销入账 - 购买凭证确认后的返现
    VerificationCredit,
    /// 提现扣减 - 提现请求创建时预留资金
    RedemptionDebit,
    /// 提现退回 - 打款失败后退回已扣减的金额
    RedemptionRefund,
}
