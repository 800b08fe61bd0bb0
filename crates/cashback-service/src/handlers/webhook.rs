//! 联盟回调相关的 HTTP 处理器
//!
//! 接收商户联盟的购买确认回调。回调是公开端点：调用方没有用户
//! Token，身份由部署层（回调地址保密 + 网关签名）保证。

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::dto::ApiResponse;
use crate::error::{CashbackError, Result};
use crate::service::dto::WebhookOutcome;
use crate::state::AppState;

/// 联盟回调载荷
///
/// 只关心订单号，其余字段原样忽略
#[derive(Debug, Deserialize)]
pub struct AffiliateWebhookPayload {
    #[serde(alias = "orderId")]
    pub order_id: Option<String>,
}

/// 联盟购买确认回调
///
/// POST /api/webhooks/affiliate
///
/// 未匹配到凭证和重复投递都返回 200 软结果，联盟侧不会对这类
/// 投递做无意义的重试
pub async fn affiliate_webhook(
    State(state): State<AppState>,
    Json(payload): Json<AffiliateWebhookPayload>,
) -> Result<Json<ApiResponse<WebhookOutcome>>> {
    let order_id = payload
        .order_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| CashbackError::Validation("回调载荷缺少 order_id".to_string()))?;

    let outcome = state
        .verification_service
        .verify_by_webhook(&order_id)
        .await?;

    Ok(Json(ApiResponse::success(outcome)))
}
