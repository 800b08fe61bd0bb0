//! 只读查询服务
//!
//! 个人资料、余额、凭证/提现/流水列表等纯读取路径。依赖仓储 trait
//! 而非具体实现，单元测试用 mock 仓储覆盖。

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CashbackError, Result};
use crate::models::{CashbackLedger, RedemptionRequest, Transaction, User};
use crate::repository::{
    LedgerRepositoryTrait, RedemptionRepositoryTrait, TransactionRepositoryTrait,
    UserRepositoryTrait,
};

/// 列表查询的默认返回条数
const DEFAULT_LIST_LIMIT: i64 = 100;

/// 只读查询服务
pub struct CashbackQueryService<UR, TR, RR, LR>
where
    UR: UserRepositoryTrait,
    TR: TransactionRepositoryTrait,
    RR: RedemptionRepositoryTrait,
    LR: LedgerRepositoryTrait,
{
    user_repo: Arc<UR>,
    transaction_repo: Arc<TR>,
    redemption_repo: Arc<RR>,
    ledger_repo: Arc<LR>,
}

impl<UR, TR, RR, LR> CashbackQueryService<UR, TR, RR, LR>
where
    UR: UserRepositoryTrait,
    TR: TransactionRepositoryTrait,
    RR: RedemptionRepositoryTrait,
    LR: LedgerRepositoryTrait,
{
    pub fn new(
        user_repo: Arc<UR>,
        transaction_repo: Arc<TR>,
        redemption_repo: Arc<RR>,
        ledger_repo: Arc<LR>,
    ) -> Self {
        Self {
            user_repo,
            transaction_repo,
            redemption_repo,
            ledger_repo,
        }
    }

    /// 获取用户资料
    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: Uuid) -> Result<User> {
        self.user_repo
            .get_user(user_id)
            .await?
            .ok_or(CashbackError::UserNotFound(user_id))
    }

    /// 获取当前可用余额
    #[instrument(skip(self))]
    pub async fn get_balance(&self, user_id: Uuid) -> Result<Decimal> {
        let user = self.get_profile(user_id).await?;
        Ok(user.cashback_balance)
    }

    /// 列出用户的购买凭证
    #[instrument(skip(self))]
    pub async fn list_transactions(&self, user_id: Uuid) -> Result<Vec<Transaction>> {
        self.transaction_repo
            .list_by_user(user_id, DEFAULT_LIST_LIMIT)
            .await
    }

    /// 列出用户的提现请求
    #[instrument(skip(self))]
    pub async fn list_redemptions(&self, user_id: Uuid) -> Result<Vec<RedemptionRequest>> {
        self.redemption_repo
            .list_by_user(user_id, DEFAULT_LIST_LIMIT)
            .await
    }

    /// 列出用户的余额流水
    #[instrument(skip(self))]
    pub async fn list_ledger(&self, user_id: Uuid) -> Result<Vec<CashbackLedger>> {
        self.ledger_repo
            .list_entries_by_user(user_id, DEFAULT_LIST_LIMIT)
            .await
    }
}
