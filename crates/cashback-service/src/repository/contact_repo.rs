//! 收款方式仓储
//!
//! 银行账户与 UPI 地址的数据访问。新增默认收款方式时，
//! 在同一事务内先取消该用户已有的默认标记。

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::traits::ContactRepositoryTrait;
use crate::error::Result;
use crate::models::{BankAccount, UpiHandle};

/// 收款方式仓储
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 创建银行账户
    pub async fn create_bank_account(&self, account: &BankAccount) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        if account.is_default {
            sqlx::query("UPDATE bank_accounts SET is_default = FALSE WHERE user_id = $1")
                .bind(account.user_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO bank_accounts (id, user_id, account_holder, account_number,
                                       ifsc_code, bank_name, is_default, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id)
        .bind(account.user_id)
        .bind(&account.account_holder)
        .bind(&account.account_number)
        .bind(&account.ifsc_code)
        .bind(&account.bank_name)
        .bind(account.is_default)
        .bind(account.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// 获取属于指定用户的银行账户
    ///
    /// 归属条件写在查询里，其他用户的账户等同于不存在
    pub async fn get_bank_account(&self, id: Uuid, user_id: Uuid) -> Result<Option<BankAccount>> {
        let account = sqlx::query_as::<_, BankAccount>(
            r#"
            SELECT id, user_id, account_holder, account_number, ifsc_code,
                   bank_name, is_default, created_at
            FROM bank_accounts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// 列出用户的银行账户
    pub async fn list_bank_accounts(&self, user_id: Uuid) -> Result<Vec<BankAccount>> {
        let accounts = sqlx::query_as::<_, BankAccount>(
            r#"
            SELECT id, user_id, account_holder, account_number, ifsc_code,
                   bank_name, is_default, created_at
            FROM bank_accounts
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    /// 创建 UPI 收款地址
    pub async fn create_upi_handle(&self, handle: &UpiHandle) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        if handle.is_default {
            sqlx::query("UPDATE upi_handles SET is_default = FALSE WHERE user_id = $1")
                .bind(handle.user_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO upi_handles (id, user_id, upi_address, is_default, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(handle.id)
        .bind(handle.user_id)
        .bind(&handle.upi_address)
        .bind(handle.is_default)
        .bind(handle.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// 获取属于指定用户的 UPI 地址
    pub async fn get_upi_handle(&self, id: Uuid, user_id: Uuid) -> Result<Option<UpiHandle>> {
        let handle = sqlx::query_as::<_, UpiHandle>(
            r#"
            SELECT id, user_id, upi_address, is_default, created_at
            FROM upi_handles
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(handle)
    }

    /// 列出用户的 UPI 地址
    pub async fn list_upi_handles(&self, user_id: Uuid) -> Result<Vec<UpiHandle>> {
        let handles = sqlx::query_as::<_, UpiHandle>(
            r#"
            SELECT id, user_id, upi_address, is_default, created_at
            FROM upi_handles
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(handles)
    }
}

#[async_trait]
impl ContactRepositoryTrait for ContactRepository {
    async fn create_bank_account(&self, account: &BankAccount) -> Result<()> {
        self.create_bank_account(account).await
    }

    async fn get_bank_account(&self, id: Uuid, user_id: Uuid) -> Result<Option<BankAccount>> {
        self.get_bank_account(id, user_id).await
    }

    async fn list_bank_accounts(&self, user_id: Uuid) -> Result<Vec<BankAccount>> {
        self.list_bank_accounts(user_id).await
    }

    async fn create_upi_handle(&self, handle: &UpiHandle) -> Result<()> {
        self.create_upi_handle(handle).await
    }

    async fn get_upi_handle(&self, id: Uuid, user_id: Uuid) -> Result<Option<UpiHandle>> {
        self.get_upi_handle(id, user_id).await
    }

    async fn list_upi_handles(&self, user_id: Uuid) -> Result<Vec<UpiHandle>> {
        self.list_upi_handles(user_id).await
    }
}
