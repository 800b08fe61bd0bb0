//! 认证相关的 HTTP 处理器
//!
//! 提供注册、登录（签发 Token）和获取当前用户的 API

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{Claims, PERMISSION_VERIFY_TRANSACTIONS, hash_password, verify_password};
use crate::dto::ApiResponse;
use crate::error::{CashbackError, Result};
use crate::models::User;
use crate::state::AppState;

// ============================================
// 请求/响应 DTO
// ============================================

/// 注册请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "名称长度必须在 1-100 之间"))]
    pub name: String,
    #[validate(length(min = 6, max = 100, message = "密码长度必须在 6-100 之间"))]
    pub password: String,
}

/// 登录请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "密码不能为空"))]
    pub password: String,
}

/// Token 响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: i64,
    pub user: User,
}

// ============================================
// API 处理器
// ============================================

/// 用户注册
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>> {
    req.validate()?;

    if state.user_repo.get_by_email(&req.email).await?.is_some() {
        return Err(CashbackError::EmailAlreadyRegistered(req.email));
    }

    let password_hash = hash_password(&req.password)?;
    let user = User::new(req.email, req.name, password_hash);
    state.user_repo.create(&user).await?;

    tracing::info!(user_id = %user.id, "新用户注册成功");

    issue_token(&state, user)
}

/// 登录并签发 Token
///
/// POST /api/auth/token
pub async fn token(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>> {
    req.validate()?;

    let user = state
        .user_repo
        .get_by_email(&req.email)
        .await?
        .ok_or(CashbackError::InvalidCredentials)?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(CashbackError::InvalidCredentials);
    }

    issue_token(&state, user)
}

/// 获取当前用户
///
/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<User>>> {
    let user = state.query_service.get_profile(claims.user_id()?).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// 签发 Token 并组装响应
///
/// 运营邮箱在签发时获得人工核销权限，普通用户权限列表为空
fn issue_token(state: &AppState, user: User) -> Result<Json<ApiResponse<TokenResponse>>> {
    let permissions = if state.verifier_emails.iter().any(|e| e == &user.email) {
        vec![PERMISSION_VERIFY_TRANSACTIONS.to_string()]
    } else {
        Vec::new()
    };

    let (access_token, expires_at) =
        state
            .jwt_manager
            .generate_token(user.id, &user.email, &user.name, permissions)?;

    Ok(Json(ApiResponse::success(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_at,
        user,
    })))
}
