//! 返现服务
//!
//! 购买凭证核销与余额提现的后端服务。
//!
//! ## 核心功能
//!
//! - **凭证核销**：用户提交购买凭证，联盟回调或运营人工核销后返现入账
//! - **余额提现**：用户将返现余额提现到银行账户或 UPI 地址
//! - **余额流水**：每一次余额变动都有只增不改的流水记录，支持审计追溯
//! - **商品目录**：带返现比例的商品列表，演示环境可灌入样例数据
//!
//! ## 资金不变量
//!
//! - 余额恒为非负（条件更新谓词保证）
//! - 每个凭证的返现至多入账一次（终态不可再迁移）
//! - 提现扣减与请求创建同事务，打款失败退回恰好一次
//!
//! ## 模块结构
//!
//! - `models`: 实体模型与状态枚举
//! - `repository`: 数据访问层（trait + sqlx 实现）
//! - `service`: 业务服务（核销、提现、只读查询）
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由配置
//! - `auth`: JWT 与密码哈希
//! - `middleware`: 认证中间件
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 数据库：PostgreSQL (sqlx)
//! - 金额：rust_decimal
//! - 序列化：serde (camelCase)

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;

// 重新导出核心类型
pub use dto::ApiResponse;
pub use error::{CashbackError, Result};
pub use models::{
    BankAccount, CashbackLedger, LedgerEntryType, Product, RedemptionMethod, RedemptionRequest,
    RedemptionStatus, Transaction, TransactionStatus, UpiHandle, User, VerificationMethod,
};
pub use service::{CashbackQueryService, RedemptionService, VerificationService};
pub use state::AppState;
