//! JWT Token 处理
//!
//! 提供 JWT Token 的生成和验证功能

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CashbackError;

/// 人工核销购买凭证所需的权限码
///
/// 普通用户 Token 不携带该权限，核销端点据此拒绝访问
pub const PERMISSION_VERIFY_TRANSACTIONS: &str = "transaction:verify";

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// 签名密钥
    pub secret: String,
    /// Token 过期时间（秒）
    pub expires_in_secs: i64,
    /// Token 签发者
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "cashx-secret-key-change-in-production".to_string(),
            expires_in_secs: 7 * 24 * 3600, // 7 天
            issuer: "cashback-service".to_string(),
        }
    }
}

/// JWT Claims（Token 载荷）
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// 用户 ID
    pub sub: String,
    /// 邮箱
    pub email: String,
    /// 显示名称
    pub name: String,
    /// 权限列表
    pub permissions: Vec<String>,
    /// 签发时间
    pub iat: i64,
    /// 过期时间
    pub exp: i64,
    /// 签发者
    pub iss: String,
}

impl Claims {
    /// 解析出用户 ID
    pub fn user_id(&self) -> Result<Uuid, CashbackError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| CashbackError::Unauthorized("Token 中的用户 ID 无效".to_string()))
    }

    /// 是否持有指定权限
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// JWT 管理器
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    /// 创建 JWT 管理器
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 生成 Token
    ///
    /// 返回 (token, 过期时间戳)
    pub fn generate_token(
        &self,
        user_id: Uuid,
        email: &str,
        name: &str,
        permissions: Vec<String>,
    ) -> Result<(String, i64), CashbackError> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.config.expires_in_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            permissions,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.config.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| CashbackError::Internal(format!("Token 生成失败: {}", e)))?;

        Ok((token, expires_at.timestamp()))
    }

    /// 验证 Token 并返回 Claims
    pub fn verify_token(&self, token: &str) -> Result<Claims, CashbackError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| CashbackError::Unauthorized(format!("Token 无效: {}", e)))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new(JwtConfig {
            secret: "test-secret".to_string(),
            expires_in_secs: 3600,
            issuer: "cashback-service".to_string(),
        })
    }

    #[test]
    fn test_generate_and_verify_token() {
        let manager = manager();
        let user_id = Uuid::new_v4();

        let (token, expires_at) = manager
            .generate_token(user_id, "alice@example.com", "Alice", vec![])
            .unwrap();
        assert!(expires_at > Utc::now().timestamp());

        let claims = manager.verify_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.email, "alice@example.com");
        assert!(!claims.has_permission(PERMISSION_VERIFY_TRANSACTIONS));
    }

    #[test]
    fn test_verifier_permission() {
        let manager = manager();
        let (token, _) = manager
            .generate_token(
                Uuid::new_v4(),
                "ops@example.com",
                "Ops",
                vec![PERMISSION_VERIFY_TRANSACTIONS.to_string()],
            )
            .unwrap();

        let claims = manager.verify_token(&token).unwrap();
        assert!(claims.has_permission(PERMISSION_VERIFY_TRANSACTIONS));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let manager = manager();
        let (token, _) = manager
            .generate_token(Uuid::new_v4(), "a@b.com", "A", vec![])
            .unwrap();

        let other = JwtManager::new(JwtConfig {
            secret: "other-secret".to_string(),
            expires_in_secs: 3600,
            issuer: "cashback-service".to_string(),
        });
        assert!(other.verify_token(&token).is_err());
    }
}
