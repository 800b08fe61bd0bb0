//! 收款方式相关的 HTTP 处理器
//!
//! 提供银行账户和 UPI 地址的新增与查询 API

use axum::{Extension, Json, extract::State};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::Claims;
use crate::dto::ApiResponse;
use crate::error::Result;
use crate::models::{BankAccount, UpiHandle};
use crate::state::AppState;

// ============================================
// 请求 DTO
// ============================================

/// 新增银行账户请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBankAccountRequest {
    #[validate(length(min = 1, max = 100, message = "开户人名称长度必须在 1-100 之间"))]
    pub account_holder: String,
    #[validate(length(min = 6, max = 20, message = "账号长度必须在 6-20 之间"))]
    pub account_number: String,
    #[validate(length(min = 1, max = 20, message = "IFSC 编码长度必须在 1-20 之间"))]
    pub ifsc_code: String,
    #[validate(length(min = 1, max = 100, message = "银行名称长度必须在 1-100 之间"))]
    pub bank_name: String,
    #[serde(default)]
    pub is_default: bool,
}

/// 新增 UPI 地址请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUpiRequest {
    #[validate(length(min = 3, max = 100, message = "UPI 地址长度必须在 3-100 之间"))]
    pub upi_address: String,
    #[serde(default)]
    pub is_default: bool,
}

// ============================================
// API 处理器
// ============================================

/// 新增银行账户
///
/// POST /api/bank-accounts
pub async fn create_bank_account(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateBankAccountRequest>,
) -> Result<Json<ApiResponse<BankAccount>>> {
    req.validate()?;

    let account = BankAccount {
        id: Uuid::new_v4(),
        user_id: claims.user_id()?,
        account_holder: req.account_holder,
        account_number: req.account_number,
        ifsc_code: req.ifsc_code,
        bank_name: req.bank_name,
        is_default: req.is_default,
        created_at: Utc::now(),
    };
    state.contact_repo.create_bank_account(&account).await?;

    Ok(Json(ApiResponse::success(account)))
}

/// 查询自己的银行账户列表
///
/// GET /api/bank-accounts
pub async fn list_bank_accounts(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<BankAccount>>>> {
    let accounts = state
        .contact_repo
        .list_bank_accounts(claims.user_id()?)
        .await?;

    Ok(Json(ApiResponse::success(accounts)))
}

/// 新增 UPI 地址
///
/// POST /api/upi
pub async fn create_upi_handle(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateUpiRequest>,
) -> Result<Json<ApiResponse<UpiHandle>>> {
    req.validate()?;

    let handle = UpiHandle {
        id: Uuid::new_v4(),
        user_id: claims.user_id()?,
        upi_address: req.upi_address,
        is_default: req.is_default,
        created_at: Utc::now(),
    };
    state.contact_repo.create_upi_handle(&handle).await?;

    Ok(Json(ApiResponse::success(handle)))
}

/// 查询自己的 UPI 地址列表
///
/// GET /api/upi
pub async fn list_upi_handles(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<UpiHandle>>>> {
    let handles = state
        .contact_repo
        .list_upi_handles(claims.user_id()?)
        .await?;

    Ok(Json(ApiResponse::success(handles)))
}
