//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

/// 认证路由（注册和登录是公开路由）
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/token", post(handlers::auth::token))
        .route("/users/me", get(handlers::auth::me))
}

/// 商品路由
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(handlers::product::list_products))
        .route("/products/{id}", get(handlers::product::get_product))
        .route("/seed/products", post(handlers::product::seed_products))
}

/// 购买凭证路由
fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(handlers::transaction::submit_claim))
        .route(
            "/transactions",
            get(handlers::transaction::list_transactions),
        )
}

/// 收款方式路由
fn payout_contact_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/bank-accounts",
            post(handlers::payout_contact::create_bank_account),
        )
        .route(
            "/bank-accounts",
            get(handlers::payout_contact::list_bank_accounts),
        )
        .route("/upi", post(handlers::payout_contact::create_upi_handle))
        .route("/upi", get(handlers::payout_contact::list_upi_handles))
}

/// 提现与余额路由
fn redemption_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/redemptions",
            post(handlers::redemption::create_redemption),
        )
        .route("/redemptions", get(handlers::redemption::list_redemptions))
        .route("/balance", get(handlers::redemption::get_balance))
        .route("/ledger", get(handlers::redemption::list_ledger))
}

/// 回调路由（公开路由，调用方没有用户 Token）
fn webhook_routes() -> Router<AppState> {
    Router::new().route(
        "/webhooks/affiliate",
        post(handlers::webhook::affiliate_webhook),
    )
}

/// 运营后台路由
fn admin_routes() -> Router<AppState> {
    Router::new().route(
        "/admin/transactions/{id}/verify",
        put(handlers::admin::verify_transaction),
    )
}

/// 构建完整的应用路由
///
/// /api 下的全部端点经过认证中间件（公开路由在中间件内放行）
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(product_routes())
        .merge(transaction_routes())
        .merge(payout_contact_routes())
        .merge(redemption_routes())
        .merge(webhook_routes())
        .merge(admin_routes());

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
