//! 数据库仓储层
//!
//! 提供所有实体的数据访问接口，封装 SQL 操作细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不包含业务逻辑
//! - 使用 SQLx 进行类型安全的数据库操作
//! - 事务控制由调用方（服务层）决定
//! - 定义 trait 接口以支持 mock 测试

mod contact_repo;
mod ledger_repo;
mod product_repo;
mod redemption_repo;
mod traits;
mod transaction_repo;
mod user_repo;

pub use contact_repo::ContactRepository;
pub use ledger_repo::LedgerRepository;
pub use product_repo::ProductRepository;
pub use redemption_repo::RedemptionRepository;
pub use traits::*;
pub use transaction_repo::TransactionRepository;
pub use user_repo::UserRepository;
