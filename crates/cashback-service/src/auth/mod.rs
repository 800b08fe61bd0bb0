//! 认证模块
//!
//! 提供 JWT Token 管理和密码哈希

mod jwt;
mod password;

pub use jwt::{Claims, JwtConfig, JwtManager, PERMISSION_VERIFY_TRANSACTIONS};
pub use password::{hash_password, verify_password};
