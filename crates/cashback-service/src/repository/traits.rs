//! 仓储 Trait 定义
//!
//! 定义仓储接口，便于服务层依赖抽象而非具体实现，支持 mock 测试。
//! 事务内的条件更新（余额扣减、状态翻转）不在 trait 中：它们必须与
//! 同事务的其他写入一起执行，由具体仓储的 `_in_tx` 关联函数提供。

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    BankAccount, CashbackLedger, Product, RedemptionRequest, Transaction, UpiHandle, User,
};

/// 用户仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn create_user(&self, user: &User) -> Result<()>;
}

/// 商品仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepositoryTrait: Send + Sync {
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>>;
    async fn list_products(
        &self,
        category: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>>;
    async fn create_product(&self, product: &Product) -> Result<()>;
    async fn delete_all_products(&self) -> Result<u64>;
}

/// 购买凭证仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    async fn create_transaction(&self, transaction: &Transaction) -> Result<()>;
    async fn get_transaction(&self, id: Uuid) -> Result<Option<Transaction>>;
    async fn get_by_order_id(&self, external_order_id: &str) -> Result<Option<Transaction>>;
    async fn get_by_idempotency_key(
        &self,
        user_id: Uuid,
        idempotency_key: &str,
    ) -> Result<Option<Transaction>>;
    async fn list_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Transaction>>;
}

/// 提现仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedemptionRepositoryTrait: Send + Sync {
    async fn get_redemption(&self, id: Uuid) -> Result<Option<RedemptionRequest>>;
    async fn list_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<RedemptionRequest>>;
}

/// 收款方式仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepositoryTrait: Send + Sync {
    async fn create_bank_account(&self, account: &BankAccount) -> Result<()>;
    async fn get_bank_account(&self, id: Uuid, user_id: Uuid) -> Result<Option<BankAccount>>;
    async fn list_bank_accounts(&self, user_id: Uuid) -> Result<Vec<BankAccount>>;
    async fn create_upi_handle(&self, handle: &UpiHandle) -> Result<()>;
    async fn get_upi_handle(&self, id: Uuid, user_id: Uuid) -> Result<Option<UpiHandle>>;
    async fn list_upi_handles(&self, user_id: Uuid) -> Result<Vec<UpiHandle>>;
}

/// 余额流水仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    async fn list_entries_by_user(&self, user_id: Uuid, limit: i64)
    -> Result<Vec<CashbackLedger>>;
}
