//! 商品相关的 HTTP 处理器
//!
//! 提供商品列表、详情和演示数据灌入的 API

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use uuid::Uuid;

use crate::dto::ApiResponse;
use crate::error::{CashbackError, Result};
use crate::models::Product;
use crate::state::AppState;

/// 商品列表查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

/// 商品列表
///
/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let skip = query.skip.unwrap_or(0).max(0);

    let products = state
        .product_repo
        .list(query.category.as_deref(), limit, skip)
        .await?;

    Ok(Json(ApiResponse::success(products)))
}

/// 商品详情
///
/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Product>>> {
    let product = state
        .product_repo
        .get(id)
        .await?
        .ok_or(CashbackError::ProductNotFound(id))?;

    Ok(Json(ApiResponse::success(product)))
}

/// 灌入演示商品数据
///
/// POST /api/seed/products
///
/// 清空商品表后重新写入样例商品，仅用于演示环境
pub async fn seed_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Product>>>> {
    state.product_repo.delete_all().await?;

    let mut products = Vec::new();
    for (title, description, price, image_url, merchant_url, category, percent) in sample_products()
    {
        let product = Product {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            price: Decimal::from_str(price)
                .map_err(|e| CashbackError::Internal(format!("样例价格无效: {}", e)))?,
            image_url: image_url.to_string(),
            merchant_url: merchant_url.to_string(),
            category: category.to_string(),
            cashback_percent: Decimal::from_str(percent)
                .map_err(|e| CashbackError::Internal(format!("样例返现比例无效: {}", e)))?,
            created_at: Utc::now(),
        };
        state.product_repo.create(&product).await?;
        products.push(product);
    }

    tracing::info!(count = products.len(), "演示商品数据已灌入");

    Ok(Json(ApiResponse::success(products)))
}

/// 样例商品（title, description, price, image_url, merchant_url, category, cashback_percent）
fn sample_products() -> Vec<(&'static str, &'static str, &'static str, &'static str, &'static str, &'static str, &'static str)> {
    vec![
        (
            "Amazon Echo Dot (5th Gen)",
            "Smart speaker with Alexa",
            "49.99",
            "https://m.media-amazon.com/images/I/71JB6hM6Z6L._AC_SL1000_.jpg",
            "https://www.amazon.com/dp/B09B8V1LZ3",
            "Electronics",
            "5.0",
        ),
        (
            "Apple AirPods Pro (2nd Gen)",
            "Wireless earbuds with noise cancellation",
            "249.99",
            "https://m.media-amazon.com/images/I/61f1YfTkTDL._AC_SL1500_.jpg",
            "https://www.amazon.com/dp/B0BDHB9Y8D",
            "Electronics",
            "3.5",
        ),
        (
            "Kindle Paperwhite",
            "E-reader with adjustable warm light",
            "139.99",
            "https://m.media-amazon.com/images/I/61PJuQdRVqL._AC_SL1500_.jpg",
            "https://www.amazon.com/dp/B08KTZ8249",
            "Electronics",
            "4.0",
        ),
        (
            "Samsung 55-Inch QLED 4K TV",
            "Quantum HDR Smart TV with Alexa Built-in",
            "897.99",
            "https://m.media-amazon.com/images/I/71LJJrKbezL._AC_SL1500_.jpg",
            "https://www.amazon.com/dp/B094C627M5",
            "Electronics",
            "2.0",
        ),
        (
            "Instant Pot Duo Plus 9-in-1",
            "Electric Pressure Cooker, Slow Cooker, Rice Cooker, and More",
            "129.95",
            "https://m.media-amazon.com/images/I/71Nw6CjweIL._AC_SL1500_.jpg",
            "https://www.amazon.com/dp/B06Y1MP2PY",
            "Home & Kitchen",
            "6.0",
        ),
        (
            "Fitbit Charge 5",
            "Advanced Fitness & Health Tracker",
            "149.95",
            "https://m.media-amazon.com/images/I/61hzuoXwjqL._AC_SL1500_.jpg",
            "https://www.amazon.com/dp/B09BXQ4QVM",
            "Sports & Outdoors",
            "5.5",
        ),
    ]
}
