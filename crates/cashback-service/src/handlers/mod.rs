//! HTTP 处理器模块

pub mod admin;
pub mod auth;
pub mod payout_contact;
pub mod product;
pub mod redemption;
pub mod transaction;
pub mod webhook;

use axum::Json;

use crate::dto::ApiResponse;

/// 健康检查
///
/// GET /health
pub async fn health() -> Json<ApiResponse<()>> {
    Json(ApiResponse::<()>::success_empty())
}
