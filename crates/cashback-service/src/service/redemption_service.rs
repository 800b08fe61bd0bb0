//! 余额提现服务
//!
//! 提现在创建时即原子扣减余额（资金预留）：扣减、请求创建与流水
//! 写入同处一个事务，提交成功后资金不再计入可用余额。后续状态
//! 推进 PENDING -> PROCESSING -> COMPLETED 不触碰余额；任一非终态
//! 标记为 FAILED 时在单个事务内退回扣减金额。
//!
//! ## 并发安全
//!
//! 扣减依赖 `adjust_balance_in_tx` 的谓词（余额扣减后仍非负），
//! 并发提现同一账户时超出余额的请求命中 0 行，返回余额不足。

use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{CashbackError, Result};
use crate::models::{
    CashbackLedger, LedgerEntryType, RedemptionMethod, RedemptionRequest, RedemptionStatus,
};
use crate::repository::{ContactRepository, LedgerRepository, RedemptionRepository, UserRepository};
use crate::service::dto::RedeemRequest;

/// 提现服务
pub struct RedemptionService {
    redemption_repo: Arc<RedemptionRepository>,
    contact_repo: Arc<ContactRepository>,
    pool: PgPool,
}

impl RedemptionService {
    pub fn new(
        redemption_repo: Arc<RedemptionRepository>,
        contact_repo: Arc<ContactRepository>,
        pool: PgPool,
    ) -> Self {
        Self {
            redemption_repo,
            contact_repo,
            pool,
        }
    }

    /// 发起提现
    ///
    /// 校验收款方式归属后，在一个事务内完成余额扣减、请求创建与
    /// 流水写入。余额不足时整体失败，不产生任何记录。
    #[instrument(skip(self, request), fields(user_id = %actor, amount = %request.amount))]
    pub async fn request_redemption(
        &self,
        actor: Uuid,
        request: RedeemRequest,
    ) -> Result<RedemptionRequest> {
        if request.amount <= Decimal::ZERO {
            return Err(CashbackError::Validation(
                "提现金额必须为正数".to_string(),
            ));
        }

        let (bank_account_id, upi_id) = self.resolve_destination(actor, &request).await?;

        let redemption = RedemptionRequest::new(
            actor,
            request.amount,
            request.method,
            bank_account_id,
            upi_id,
        );

        let mut tx = self.pool.begin().await?;

        let new_balance = UserRepository::adjust_balance_in_tx(&mut tx, actor, -request.amount)
            .await?;

        let new_balance = match new_balance {
            Some(balance) => balance,
            None => {
                // 区分用户不存在和余额不足
                let available = UserRepository::get_balance_in_tx(&mut tx, actor)
                    .await?
                    .ok_or(CashbackError::UserNotFound(actor))?;
                tx.rollback().await?;
                return Err(CashbackError::InsufficientBalance {
                    requested: request.amount,
                    available,
                });
            }
        };

        RedemptionRepository::create_in_tx(&mut tx, &redemption).await?;

        let entry = CashbackLedger::entry(
            actor,
            LedgerEntryType::RedemptionDebit,
            -request.amount,
            new_balance,
            Some(redemption.id),
            Some("提现资金预留".to_string()),
        );
        LedgerRepository::create_in_tx(&mut tx, &entry).await?;

        tx.commit().await?;

        info!(
            redemption_id = %redemption.id,
            new_balance = %new_balance,
            "提现请求已创建，余额已扣减"
        );

        Ok(redemption)
    }

    /// 列出用户的提现请求（创建时间倒序）
    #[instrument(skip(self))]
    pub async fn list_redemptions(&self, actor: Uuid) -> Result<Vec<RedemptionRequest>> {
        self.redemption_repo.list_by_user(actor, 100).await
    }

    /// 标记为打款处理中（PENDING -> PROCESSING）
    #[instrument(skip(self))]
    pub async fn mark_processing(&self, redemption_id: Uuid) -> Result<RedemptionRequest> {
        self.advance(
            redemption_id,
            RedemptionStatus::Pending,
            RedemptionStatus::Processing,
        )
        .await
    }

    /// 标记为打款完成（PROCESSING -> COMPLETED）
    ///
    /// 完成不触碰余额，扣减在创建时已经发生
    #[instrument(skip(self))]
    pub async fn mark_completed(&self, redemption_id: Uuid) -> Result<RedemptionRequest> {
        self.advance(
            redemption_id,
            RedemptionStatus::Processing,
            RedemptionStatus::Completed,
        )
        .await
    }

    /// 标记为打款失败并退回余额
    ///
    /// 状态翻转与退款同事务：翻转未命中（已终态或不存在）时不退款，
    /// 保证失败退回恰好发生一次。
    #[instrument(skip(self, reason))]
    pub async fn mark_failed(
        &self,
        redemption_id: Uuid,
        reason: &str,
    ) -> Result<RedemptionRequest> {
        let redemption = self
            .redemption_repo
            .get(redemption_id)
            .await?
            .ok_or(CashbackError::RedemptionNotFound(redemption_id))?;

        let mut tx = self.pool.begin().await?;

        let rows = RedemptionRepository::mark_failed_in_tx(&mut tx, redemption_id, reason).await?;
        if rows == 0 {
            tx.rollback().await?;
            return Err(CashbackError::InvalidRedemptionStatus {
                redemption_id,
                current_status: format!("{:?}", redemption.status).to_lowercase(),
            });
        }

        let new_balance =
            UserRepository::adjust_balance_in_tx(&mut tx, redemption.user_id, redemption.amount)
                .await?
                // 退款为正数，谓词只会因用户不存在而失败
                .ok_or(CashbackError::UserNotFound(redemption.user_id))?;

        let entry = CashbackLedger::entry(
            redemption.user_id,
            LedgerEntryType::RedemptionRefund,
            redemption.amount,
            new_balance,
            Some(redemption_id),
            Some(format!("提现失败退回: {}", reason)),
        );
        LedgerRepository::create_in_tx(&mut tx, &entry).await?;

        tx.commit().await?;

        info!(
            redemption_id = %redemption_id,
            refunded = %redemption.amount,
            "提现失败，扣减金额已退回"
        );

        self.redemption_repo
            .get(redemption_id)
            .await?
            .ok_or(CashbackError::RedemptionNotFound(redemption_id))
    }

    /// 条件推进状态，未命中时回读以给出精确错误
    async fn advance(
        &self,
        redemption_id: Uuid,
        expected: RedemptionStatus,
        new_status: RedemptionStatus,
    ) -> Result<RedemptionRequest> {
        let rows = self
            .redemption_repo
            .advance_status(redemption_id, expected, new_status)
            .await?;

        if rows == 0 {
            let current = self
                .redemption_repo
                .get(redemption_id)
                .await?
                .ok_or(CashbackError::RedemptionNotFound(redemption_id))?;
            return Err(CashbackError::InvalidRedemptionStatus {
                redemption_id,
                current_status: format!("{:?}", current.status).to_lowercase(),
            });
        }

        info!(
            redemption_id = %redemption_id,
            new_status = ?new_status,
            "提现状态已推进"
        );

        self.redemption_repo
            .get(redemption_id)
            .await?
            .ok_or(CashbackError::RedemptionNotFound(redemption_id))
    }

    /// 校验收款方式与提现方式匹配且归属于发起人
    ///
    /// 归属校验通过按 (id, user_id) 查询实现，他人的收款方式等同于
    /// 不存在
    async fn resolve_destination(
        &self,
        actor: Uuid,
        request: &RedeemRequest,
    ) -> Result<(Option<Uuid>, Option<Uuid>)> {
        match request.method {
            RedemptionMethod::BankTransfer => {
                if request.upi_id.is_some() {
                    return Err(CashbackError::Validation(
                        "银行转账提现不能携带 UPI 地址".to_string(),
                    ));
                }
                let account_id = request.bank_account_id.ok_or_else(|| {
                    CashbackError::Validation("银行转账提现必须指定银行账户".to_string())
                })?;
                self.contact_repo
                    .get_bank_account(account_id, actor)
                    .await?
                    .ok_or(CashbackError::PayoutContactNotFound(account_id))?;
                Ok((Some(account_id), None))
            }
            RedemptionMethod::Upi => {
                if request.bank_account_id.is_some() {
                    return Err(CashbackError::Validation(
                        "UPI 提现不能携带银行账户".to_string(),
                    ));
                }
                let upi_id = request
                    .upi_id
                    .ok_or_else(|| {
                        CashbackError::Validation("UPI 提现必须指定 UPI 地址".to_string())
                    })?;
                self.contact_repo
                    .get_upi_handle(upi_id, actor)
                    .await?
                    .ok_or(CashbackError::PayoutContactNotFound(upi_id))?;
                Ok((None, Some(upi_id)))
            }
        }
    }
}
