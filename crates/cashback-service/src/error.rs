//! 返现服务错误类型
//!
//! 定义服务层的业务错误和系统错误，以及到 HTTP 响应的映射

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// 返现服务错误类型
#[derive(Debug, Error)]
pub enum CashbackError {
    // === 认证错误 ===
    #[error("未授权: {0}")]
    Unauthorized(String),

    #[error("禁止访问: {0}")]
    Forbidden(String),

    #[error("邮箱或密码错误")]
    InvalidCredentials,

    #[error("邮箱已被注册: {0}")]
    EmailAlreadyRegistered(String),

    // === 资源不存在 ===
    #[error("用户不存在: {0}")]
    UserNotFound(Uuid),

    #[error("商品不存在: {0}")]
    ProductNotFound(Uuid),

    #[error("购买凭证不存在: {0}")]
    TransactionNotFound(Uuid),

    #[error("提现请求不存在: {0}")]
    RedemptionNotFound(Uuid),

    #[error("收款方式不存在或不属于当前用户: {0}")]
    PayoutContactNotFound(Uuid),

    // === 业务错误 ===
    #[error("余额不足: 请求 {requested}, 可用 {available}")]
    InsufficientBalance {
        requested: Decimal,
        available: Decimal,
    },

    #[error("凭证已处于终态，不允许再次核销: transaction_id={transaction_id}, current_status={current_status}")]
    TransactionAlreadyDecided {
        transaction_id: Uuid,
        current_status: String,
    },

    #[error("外部订单号已被其他凭证使用: {0}")]
    DuplicateOrderId(String),

    #[error("提现状态不允许此操作: redemption_id={redemption_id}, current_status={current_status}")]
    InvalidRedemptionStatus {
        redemption_id: Uuid,
        current_status: String,
    },

    // === 参数校验 ===
    #[error("参数校验失败: {0}")]
    Validation(String),

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON 序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 返现服务 Result 类型别名
pub type Result<T> = std::result::Result<T, CashbackError>;

impl CashbackError {
    /// 检查是否为可重试的错误
    ///
    /// 数据库超时/连接类错误对调用方是瞬态失败，可带退避重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(
            self,
            Self::Database(_) | Self::Serialization(_) | Self::Internal(_)
        )
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::EmailAlreadyRegistered(_) => "EMAIL_ALREADY_REGISTERED",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::RedemptionNotFound(_) => "REDEMPTION_NOT_FOUND",
            Self::PayoutContactNotFound(_) => "PAYOUT_CONTACT_NOT_FOUND",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::TransactionAlreadyDecided { .. } => "TRANSACTION_ALREADY_DECIDED",
            Self::DuplicateOrderId(_) => "DUPLICATE_ORDER_ID",
            Self::InvalidRedemptionStatus { .. } => "INVALID_REDEMPTION_STATUS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,

            Self::UserNotFound(_)
            | Self::ProductNotFound(_)
            | Self::TransactionNotFound(_)
            | Self::RedemptionNotFound(_) => StatusCode::NOT_FOUND,

            Self::EmailAlreadyRegistered(_)
            | Self::TransactionAlreadyDecided { .. }
            | Self::DuplicateOrderId(_)
            | Self::InvalidRedemptionStatus { .. } => StatusCode::CONFLICT,

            // 收款方式校验失败与参数错误一样是 400：请求引用了无效目标
            Self::PayoutContactNotFound(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,

            Self::InsufficientBalance { .. } => StatusCode::UNPROCESSABLE_ENTITY,

            Self::Database(_) | Self::Serialization(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for CashbackError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志，防止信息泄露
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "数据库操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Serialization(e) => {
                tracing::error!(error = %e, "JSON 处理失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for CashbackError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid() -> Uuid {
        Uuid::new_v4()
    }

    /// 构造所有错误变体及其期望的 (StatusCode, error_code) 映射。
    /// 错误码是 API 契约的一部分，客户端用它做条件分支，新增变体时在此处维护。
    fn all_error_variants() -> Vec<(CashbackError, StatusCode, &'static str)> {
        vec![
            (
                CashbackError::Unauthorized("token expired".into()),
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
            ),
            (
                CashbackError::Forbidden("verifier permission required".into()),
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
            ),
            (
                CashbackError::InvalidCredentials,
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
            ),
            (
                CashbackError::EmailAlreadyRegistered("a@b.com".into()),
                StatusCode::CONFLICT,
                "EMAIL_ALREADY_REGISTERED",
            ),
            (
                CashbackError::UserNotFound(uuid()),
                StatusCode::NOT_FOUND,
                "USER_NOT_FOUND",
            ),
            (
                CashbackError::ProductNotFound(uuid()),
                StatusCode::NOT_FOUND,
                "PRODUCT_NOT_FOUND",
            ),
            (
                CashbackError::TransactionNotFound(uuid()),
                StatusCode::NOT_FOUND,
                "TRANSACTION_NOT_FOUND",
            ),
            (
                CashbackError::RedemptionNotFound(uuid()),
                StatusCode::NOT_FOUND,
                "REDEMPTION_NOT_FOUND",
            ),
            (
                CashbackError::PayoutContactNotFound(uuid()),
                StatusCode::BAD_REQUEST,
                "PAYOUT_CONTACT_NOT_FOUND",
            ),
            (
                CashbackError::InsufficientBalance {
                    requested: Decimal::from(50),
                    available: Decimal::from(30),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
                "INSUFFICIENT_BALANCE",
            ),
            (
                CashbackError::TransactionAlreadyDecided {
                    transaction_id: uuid(),
                    current_status: "verified".into(),
                },
                StatusCode::CONFLICT,
                "TRANSACTION_ALREADY_DECIDED",
            ),
            (
                CashbackError::DuplicateOrderId("ORD-1".into()),
                StatusCode::CONFLICT,
                "DUPLICATE_ORDER_ID",
            ),
            (
                CashbackError::InvalidRedemptionStatus {
                    redemption_id: uuid(),
                    current_status: "completed".into(),
                },
                StatusCode::CONFLICT,
                "INVALID_REDEMPTION_STATUS",
            ),
            (
                CashbackError::Validation("amount must be positive".into()),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                CashbackError::Internal("unexpected state".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ]
    }

    #[test]
    fn test_all_variants_status_code() {
        for (error, expected_status, label) in all_error_variants() {
            assert_eq!(
                error.status_code(),
                expected_status,
                "状态码不匹配: variant={label}"
            );
        }
    }

    #[test]
    fn test_all_variants_error_code() {
        for (error, _status, expected_code) in all_error_variants() {
            assert_eq!(
                error.error_code(),
                expected_code,
                "错误码不匹配: expected={expected_code}"
            );
        }
    }

    #[test]
    fn test_error_is_retryable() {
        assert!(CashbackError::Database(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(!CashbackError::InvalidCredentials.is_retryable());
        assert!(
            !CashbackError::InsufficientBalance {
                requested: Decimal::from(50),
                available: Decimal::from(30),
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_error_is_business_error() {
        assert!(
            CashbackError::InsufficientBalance {
                requested: Decimal::from(5),
                available: Decimal::ZERO,
            }
            .is_business_error()
        );
        assert!(CashbackError::Validation("bad".into()).is_business_error());
        assert!(!CashbackError::Internal("panic".into()).is_business_error());
        assert!(!CashbackError::Database(sqlx::Error::PoolTimedOut).is_business_error());
    }

    #[test]
    fn test_display_contains_context() {
        let err = CashbackError::InsufficientBalance {
            requested: Decimal::from(50),
            available: Decimal::from(30),
        };
        assert!(err.to_string().contains("50"));
        assert!(err.to_string().contains("30"));

        let id = uuid();
        assert!(
            CashbackError::TransactionNotFound(id)
                .to_string()
                .contains(&id.to_string())
        );
    }

    #[tokio::test]
    async fn test_into_response_hides_internal_details() {
        use http_body_util::BodyExt;

        let response =
            CashbackError::Internal("connection pool exhausted at worker 3".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert!(!body["message"].as_str().unwrap().contains("worker 3"));
    }
}
