//! 购买凭证核销服务
//!
//! 管理凭证从创建到终态的状态机：PENDING -> VERIFIED | REJECTED，
//! 两个终态均不可再迁移。核心不变量：cashback_amount 至多入账一次，
//! 且仅在迁入 VERIFIED 的那次状态翻转中入账。
//!
//! ## 并发安全
//!
//! 状态翻转和余额入账在同一个数据库事务内完成。翻转语句的谓词带
//! status = 'pending'，并发核销同一凭证时只有一个事务命中，其余
//! 事务看到 0 行命中后回滚，不会重复入账。

use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::{Claims, PERMISSION_VERIFY_TRANSACTIONS};
use crate::error::{CashbackError, Result};
use crate::models::{
    CashbackLedger, LedgerEntryType, Transaction, TransactionStatus, VerificationMethod,
};
use crate::repository::{
    LedgerRepository, ProductRepository, TransactionRepository, UserRepository,
};
use crate::service::dto::{SubmitClaimRequest, VerificationDecision, WebhookOutcome};

/// 凭证核销服务
pub struct VerificationService {
    product_repo: Arc<ProductRepository>,
    transaction_repo: Arc<TransactionRepository>,
    pool: PgPool,
}

impl VerificationService {
    pub fn new(
        product_repo: Arc<ProductRepository>,
        transaction_repo: Arc<TransactionRepository>,
        pool: PgPool,
    ) -> Self {
        Self {
            product_repo,
            transaction_repo,
            pool,
        }
    }

    /// 提交购买凭证
    ///
    /// 返现金额按商品当前比例一次性算定。携带幂等键的重试请求
    /// 返回已有凭证而非新建。
    #[instrument(skip(self, request), fields(user_id = %actor, product_id = %request.product_id))]
    pub async fn submit_claim(
        &self,
        actor: Uuid,
        request: SubmitClaimRequest,
    ) -> Result<Transaction> {
        if request.amount <= Decimal::ZERO {
            return Err(CashbackError::Validation(
                "购买金额必须为正数".to_string(),
            ));
        }

        // 幂等检查：重试提交返回已有凭证
        if let Some(key) = &request.idempotency_key {
            if let Some(existing) = self
                .transaction_repo
                .get_by_idempotency_key(actor, key)
                .await?
            {
                info!(
                    idempotency_key = %key,
                    transaction_id = %existing.id,
                    "幂等请求，返回已存在的凭证"
                );
                return Ok(existing);
            }
        }

        let product = self
            .product_repo
            .get(request.product_id)
            .await?
            .ok_or(CashbackError::ProductNotFound(request.product_id))?;

        // 外部订单号全局唯一，重复提交是冲突而非新凭证
        if let Some(order_id) = &request.external_order_id {
            if self
                .transaction_repo
                .get_by_order_id(order_id)
                .await?
                .is_some()
            {
                return Err(CashbackError::DuplicateOrderId(order_id.clone()));
            }
        }

        let cashback_amount = product.cashback_for(request.amount);

        let transaction = Transaction {
            id: Uuid::new_v4(),
            user_id: actor,
            product_id: product.id,
            external_order_id: request.external_order_id,
            amount: request.amount,
            cashback_amount,
            status: TransactionStatus::Pending,
            verification_method: VerificationMethod::SelfReported,
            verified_at: None,
            verification_notes: None,
            evidence_url: request.evidence_url,
            idempotency_key: request.idempotency_key,
            created_at: chrono::Utc::now(),
        };

        if let Err(e) = self.transaction_repo.create(&transaction).await {
            // 预检与插入之间存在竞争窗口，唯一索引兜底
            if is_unique_violation(&e, "idx_transactions_external_order_id") {
                let order_id = transaction.external_order_id.unwrap_or_default();
                return Err(CashbackError::DuplicateOrderId(order_id));
            }
            if is_unique_violation(&e, "idx_transactions_idempotency_key") {
                if let Some(key) = &transaction.idempotency_key {
                    if let Some(existing) =
                        self.transaction_repo.get_by_idempotency_key(actor, key).await?
                    {
                        return Ok(existing);
                    }
                }
            }
            return Err(e);
        }

        info!(
            transaction_id = %transaction.id,
            cashback_amount = %transaction.cashback_amount,
            "购买凭证已创建"
        );

        Ok(transaction)
    }

    /// webhook 核销
    ///
    /// 按外部订单号查找凭证。未命中返回软结果 NoMatch（迟到注册或
    /// 他方订单属于预期流量）；重复投递返回 AlreadyDecided，不会
    /// 二次入账。
    #[instrument(skip(self))]
    pub async fn verify_by_webhook(&self, order_id: &str) -> Result<WebhookOutcome> {
        let transaction = match self.transaction_repo.get_by_order_id(order_id).await? {
            Some(t) => t,
            None => {
                warn!(order_id = %order_id, "webhook 未匹配到任何凭证");
                return Ok(WebhookOutcome::NoMatch);
            }
        };

        let outcome = self
            .decide(
                &transaction,
                TransactionStatus::Verified,
                VerificationMethod::Webhook,
                None,
            )
            .await?;

        match outcome {
            DecideOutcome::Applied => {
                info!(
                    transaction_id = %transaction.id,
                    user_id = %transaction.user_id,
                    cashback_amount = %transaction.cashback_amount,
                    "webhook 核销成功，返现已入账"
                );
                Ok(WebhookOutcome::Credited {
                    transaction_id: transaction.id,
                })
            }
            DecideOutcome::AlreadyDecided => {
                info!(
                    transaction_id = %transaction.id,
                    "凭证已处于终态，webhook 重复投递按无操作处理"
                );
                Ok(WebhookOutcome::AlreadyDecided {
                    transaction_id: transaction.id,
                })
            }
        }
    }

    /// 人工核销
    ///
    /// 需要 transaction:verify 权限。对已处于终态的凭证再次核销
    /// 返回冲突错误，余额不变。
    #[instrument(skip(self, actor, notes), fields(operator = %actor.sub))]
    pub async fn verify_manually(
        &self,
        actor: &Claims,
        transaction_id: Uuid,
        decision: VerificationDecision,
        notes: Option<String>,
    ) -> Result<Transaction> {
        if !actor.has_permission(PERMISSION_VERIFY_TRANSACTIONS) {
            return Err(CashbackError::Forbidden(
                "人工核销需要 transaction:verify 权限".to_string(),
            ));
        }

        let transaction = self
            .transaction_repo
            .get(transaction_id)
            .await?
            .ok_or(CashbackError::TransactionNotFound(transaction_id))?;

        let new_status = match decision {
            VerificationDecision::Verified => TransactionStatus::Verified,
            VerificationDecision::Rejected => TransactionStatus::Rejected,
        };

        let outcome = self
            .decide(
                &transaction,
                new_status,
                VerificationMethod::Manual,
                notes.as_deref(),
            )
            .await?;

        if let DecideOutcome::AlreadyDecided = outcome {
            // 人工操作面向运营界面，终态冲突需要显式报错
            let current = self
                .transaction_repo
                .get(transaction_id)
                .await?
                .ok_or(CashbackError::TransactionNotFound(transaction_id))?;
            return Err(CashbackError::TransactionAlreadyDecided {
                transaction_id,
                current_status: format!("{:?}", current.status).to_lowercase(),
            });
        }

        info!(
            transaction_id = %transaction_id,
            decision = ?decision,
            "人工核销完成"
        );

        self.transaction_repo
            .get(transaction_id)
            .await?
            .ok_or(CashbackError::TransactionNotFound(transaction_id))
    }

    /// 在单个事务内完成状态翻转与余额入账
    ///
    /// 翻转命中且目标状态为 Verified 时：入账 cashback_amount 并写入
    /// 流水；目标为 Rejected 时无余额变动。翻转未命中（凭证已被其他
    /// 请求处理）时回滚并返回 AlreadyDecided。
    async fn decide(
        &self,
        transaction: &Transaction,
        new_status: TransactionStatus,
        method: VerificationMethod,
        notes: Option<&str>,
    ) -> Result<DecideOutcome> {
        let mut tx = self.pool.begin().await?;

        let rows = TransactionRepository::decide_in_tx(
            &mut tx,
            transaction.id,
            new_status,
            method,
            notes,
        )
        .await?;

        if rows == 0 {
            tx.rollback().await?;
            return Ok(DecideOutcome::AlreadyDecided);
        }

        if new_status == TransactionStatus::Verified {
            let new_balance = UserRepository::adjust_balance_in_tx(
                &mut tx,
                transaction.user_id,
                transaction.cashback_amount,
            )
            .await?
            // 入账为正数，谓词只会因用户不存在而失败
            .ok_or(CashbackError::UserNotFound(transaction.user_id))?;

            let entry = CashbackLedger::entry(
                transaction.user_id,
                LedgerEntryType::VerificationCredit,
                transaction.cashback_amount,
                new_balance,
                Some(transaction.id),
                Some(format!("凭证核销入账: {:?}", method)),
            );
            LedgerRepository::create_in_tx(&mut tx, &entry).await?;
        }

        tx.commit().await?;

        Ok(DecideOutcome::Applied)
    }
}

/// 判断错误是否为命中指定唯一索引的违例
fn is_unique_violation(error: &CashbackError, constraint: &str) -> bool {
    match error {
        CashbackError::Database(sqlx::Error::Database(db_err)) => {
            db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

/// 状态翻转的事务内结果
enum DecideOutcome {
    /// 翻转命中，余额效果（若有）已提交
    Applied,
    /// 凭证已被处理，事务已回滚
    AlreadyDecided,
}
