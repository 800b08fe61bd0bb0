//! 用户仓储
//!
//! 提供用户记录的数据访问。余额调整只通过 `adjust_balance_in_tx` 暴露：
//! 一条条件更新语句同时完成扣减/入账和非负校验，调用方必须在事务内
//! 与业务写入（凭证状态翻转、提现请求创建）一起提交。

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::traits::UserRepositoryTrait;
use crate::error::Result;
use crate::models::User;

/// 用户仓储
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 创建用户
    pub async fn create(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, password_hash, cashback_balance, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.cashback_balance)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// 获取用户
    pub async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, cashback_balance, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// 按邮箱获取用户（登录和注册查重）
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, cashback_balance, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// 在事务中原子调整余额
    ///
    /// 非负校验写在 UPDATE 的谓词里，并发扣减不可能把余额打到负数。
    /// 返回 None 表示用户不存在或余额不足（由调用方在同一事务内读取
    /// 当前余额来区分两种情况）。
    pub async fn adjust_balance_in_tx(
        tx: &mut PgConnection,
        user_id: Uuid,
        delta: Decimal,
    ) -> Result<Option<Decimal>> {
        let new_balance = sqlx::query_scalar::<_, Decimal>(
            r#"
            UPDATE users
            SET cashback_balance = cashback_balance + $2
            WHERE id = $1 AND cashback_balance + $2 >= 0
            RETURNING cashback_balance
            "#,
        )
        .bind(user_id)
        .bind(delta)
        .fetch_optional(tx)
        .await?;

        Ok(new_balance)
    }

    /// 在事务中读取当前余额
    ///
    /// 用于在 adjust_balance_in_tx 失败后区分 NotFound 和 InsufficientBalance
    pub async fn get_balance_in_tx(
        tx: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Option<Decimal>> {
        let balance = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT cashback_balance FROM users WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(tx)
        .await?;

        Ok(balance)
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        self.get(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_by_email(email).await
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        self.create(user).await
    }
}
