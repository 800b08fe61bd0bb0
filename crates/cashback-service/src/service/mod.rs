//! 业务服务层
//!
//! 核销与提现是事务密集路径，依赖具体仓储的 `_in_tx` 关联函数；
//! 只读查询依赖仓储 trait，便于 mock 测试。

pub mod dto;
mod query_service;
mod redemption_service;
mod verification_service;

pub use query_service::CashbackQueryService;
pub use redemption_service::RedemptionService;
pub use verification_service::VerificationService;
