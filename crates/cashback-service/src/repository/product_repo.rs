//! 商品仓储
//!
//! 商品目录对核销流程是只读协作方，这里同时保留演示用的
//! 列表 / 详情 / 种子数据接口

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::traits::ProductRepositoryTrait;
use crate::error::Result;
use crate::models::Product;

/// 商品仓储
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 获取单个商品
    pub async fn get(&self, id: Uuid) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, title, description, price, image_url, merchant_url,
                   category, cashback_percent, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// 分页列出商品，可按分类过滤
    pub async fn list(
        &self,
        category: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>> {
        let products = if let Some(category) = category {
            sqlx::query_as::<_, Product>(
                r#"
                SELECT id, title, description, price, image_url, merchant_url,
                       category, cashback_percent, created_at
                FROM products
                WHERE category = $1
                ORDER BY created_at DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(category)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Product>(
                r#"
                SELECT id, title, description, price, image_url, merchant_url,
                       category, cashback_percent, created_at
                FROM products
                ORDER BY created_at DESC
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(products)
    }

    /// 创建商品（种子数据）
    pub async fn create(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, title, description, price, image_url, merchant_url,
                                  category, cashback_percent, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(product.id)
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(&product.merchant_url)
        .bind(&product.category)
        .bind(product.cashback_percent)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// 清空商品表（种子数据重建前调用）
    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM products")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ProductRepositoryTrait for ProductRepository {
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>> {
        self.get(id).await
    }

    async fn list_products(
        &self,
        category: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>> {
        self.list(category.as_deref(), limit, offset).await
    }

    async fn create_product(&self, product: &Product) -> Result<()> {
        self.create(product).await
    }

    async fn delete_all_products(&self) -> Result<u64> {
        self.delete_all().await
    }
}
