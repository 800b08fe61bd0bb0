//! 提现相关的 HTTP 处理器
//!
//! 提供发起提现、查询提现列表和查询余额的 API

use axum::{Extension, Json, extract::State};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::auth::Claims;
use crate::dto::ApiResponse;
use crate::error::Result;
use crate::models::{CashbackLedger, RedemptionRequest};
use crate::service::dto::RedeemRequest;
use crate::state::AppState;

/// 余额响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub cashback_balance: Decimal,
}

/// 发起提现
///
/// POST /api/redemptions
pub async fn create_redemption(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RedeemRequest>,
) -> Result<Json<ApiResponse<RedemptionRequest>>> {
    let redemption = state
        .redemption_service
        .request_redemption(claims.user_id()?, req)
        .await?;

    Ok(Json(ApiResponse::success(redemption)))
}

/// 查询自己的提现列表
///
/// GET /api/redemptions
pub async fn list_redemptions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<RedemptionRequest>>>> {
    let redemptions = state
        .query_service
        .list_redemptions(claims.user_id()?)
        .await?;

    Ok(Json(ApiResponse::success(redemptions)))
}

/// 查询可用余额
///
/// GET /api/balance
pub async fn get_balance(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<BalanceResponse>>> {
    let cashback_balance = state.query_service.get_balance(claims.user_id()?).await?;

    Ok(Json(ApiResponse::success(BalanceResponse {
        cashback_balance,
    })))
}

/// 查询自己的余额流水
///
/// GET /api/ledger
pub async fn list_ledger(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<CashbackLedger>>>> {
    let entries = state.query_service.list_ledger(claims.user_id()?).await?;

    Ok(Json(ApiResponse::success(entries)))
}
