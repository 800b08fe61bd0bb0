//! 购买凭证相关的 HTTP 处理器
//!
//! 提供提交凭证和查询自己凭证列表的 API

use axum::{Extension, Json, extract::State};

use crate::auth::Claims;
use crate::dto::ApiResponse;
use crate::error::Result;
use crate::models::Transaction;
use crate::service::dto::SubmitClaimRequest;
use crate::state::AppState;

/// 提交购买凭证
///
/// POST /api/transactions
pub async fn submit_claim(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitClaimRequest>,
) -> Result<Json<ApiResponse<Transaction>>> {
    let transaction = state
        .verification_service
        .submit_claim(claims.user_id()?, req)
        .await?;

    Ok(Json(ApiResponse::success(transaction)))
}

/// 查询自己的凭证列表
///
/// GET /api/transactions
pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<Transaction>>>> {
    let transactions = state
        .query_service
        .list_transactions(claims.user_id()?)
        .await?;

    Ok(Json(ApiResponse::success(transactions)))
}
