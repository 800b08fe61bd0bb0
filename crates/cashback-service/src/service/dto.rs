//! 服务层数据传输对象定义

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::RedemptionMethod;

/// 提交购买凭证请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitClaimRequest {
    pub product_id: Uuid,
    /// 商户侧订单号，webhook 核销依赖此字段
    pub external_order_id: Option<String>,
    pub amount: Decimal,
    /// 凭证截图地址
    pub evidence_url: Option<String>,
    /// 客户端幂等键，重试时返回已有凭证
    pub idempotency_key: Option<String>,
}

/// 人工核销决定
///
/// 只能把 Pending 凭证迁入两个终态之一
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationDecision {
    Verified,
    Rejected,
}

/// webhook 核销结果
///
/// 未命中与重复投递都是预期流量，以软结果返回而非错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookOutcome {
    /// 核销成功，返现已入账
    #[serde(rename_all = "camelCase")]
    Credited { transaction_id: Uuid },
    /// 凭证已处于终态，本次投递为幂等无操作
    #[serde(rename_all = "camelCase")]
    AlreadyDecided { transaction_id: Uuid },
    /// 没有匹配的凭证（迟到注册或他方订单）
    NoMatch,
}

/// 提现请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    pub amount: Decimal,
    pub method: RedemptionMethod,
    /// method = BANK_TRANSFER 时必填
    pub bank_account_id: Option<Uuid>,
    /// method = UPI 时必填
    pub upi_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_outcome_serialization() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(WebhookOutcome::Credited { transaction_id: id }).unwrap();
        assert_eq!(json["outcome"], "CREDITED");
        assert_eq!(json["transactionId"], id.to_string());

        let json = serde_json::to_value(WebhookOutcome::NoMatch).unwrap();
        assert_eq!(json["outcome"], "NO_MATCH");
    }

    #[test]
    fn test_redeem_request_deserialization() {
        let req: RedeemRequest = serde_json::from_value(serde_json::json!({
            "amount": "25.50",
            "method": "UPI",
            "upiId": Uuid::new_v4().to_string(),
        }))
        .unwrap();
        assert_eq!(req.method, RedemptionMethod::Upi);
        assert!(req.upi_id.is_some());
        assert!(req.bank_account_id.is_none());
    }
}
