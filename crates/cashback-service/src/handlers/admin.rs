//! 运营后台相关的 HTTP 处理器
//!
//! 提供人工核销购买凭证的 API，需要 transaction:verify 权限

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Claims;
use crate::dto::ApiResponse;
use crate::error::Result;
use crate::models::Transaction;
use crate::service::dto::VerificationDecision;
use crate::state::AppState;

/// 人工核销请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTransactionRequest {
    pub decision: VerificationDecision,
    pub notes: Option<String>,
}

/// 人工核销购买凭证
///
/// PUT /api/admin/transactions/{id}/verify
pub async fn verify_transaction(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<VerifyTransactionRequest>,
) -> Result<Json<ApiResponse<Transaction>>> {
    let transaction = state
        .verification_service
        .verify_manually(&claims, id, req.decision, req.notes)
        .await?;

    Ok(Json(ApiResponse::success(transaction)))
}
