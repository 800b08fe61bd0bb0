//! 返现服务领域模型
//!
//! 包含返现系统的所有核心实体定义

pub mod contact;
pub mod enums;
pub mod ledger;
pub mod product;
pub mod redemption;
pub mod transaction;
pub mod user;

// 重新导出常用类型
pub use contact::{BankAccount, UpiHandle};
pub use enums::{
    LedgerEntryType, RedemptionMethod, RedemptionStatus, TransactionStatus, VerificationMethod,
};
pub use ledger::CashbackLedger;
pub use product::Product;
pub use redemption::RedemptionRequest;
pub use transaction::Transaction;
pub use user::User;
