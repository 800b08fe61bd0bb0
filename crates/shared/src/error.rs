//! 基础设施错误类型
//!
//! 共享库内部使用的错误类型，业务错误由各服务自行定义。

use thiserror::Error;

/// 基础设施错误
#[derive(Debug, Error)]
pub enum SharedError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),

    #[error("可观测性初始化失败: {0}")]
    Observability(String),
}

/// 共享库 Result 类型别名
pub type Result<T> = std::result::Result<T, SharedError>;
