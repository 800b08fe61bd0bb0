//! RedemptionService 集成测试
//!
//! 使用真实 PostgreSQL 测试提现的完整业务流程。提现路径是跨表
//! 事务（余额扣减 + 请求创建 + 流水写入，失败时的退款同理），
//! 无法通过纯 mock 覆盖，因此需要集成测试。
//!
//! ## 运行方式
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo test --test redemption_service_test -- --ignored
//! ```

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use cashback_service::error::CashbackError;
use cashback_service::models::{RedemptionMethod, RedemptionStatus, UpiHandle};
use cashback_service::repository::{ContactRepository, RedemptionRepository};
use cashback_service::service::RedemptionService;
use cashback_service::service::dto::RedeemRequest;

// ==================== 辅助函数 ====================

fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests")
}

fn setup_service(pool: &PgPool) -> RedemptionService {
    RedemptionService::new(
        Arc::new(RedemptionRepository::new(pool.clone())),
        Arc::new(ContactRepository::new(pool.clone())),
        pool.clone(),
    )
}

/// 插入测试用户，返回用户 ID
async fn seed_user(pool: &PgPool, balance: Decimal) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO users (id, email, name, password_hash, cashback_balance, created_at)
        VALUES ($1, $2, 'Integ User', '$2b$12$test', $3, $4)
        "#,
    )
    .bind(id)
    .bind(format!("integ-{}@example.com", id))
    .bind(balance)
    .bind(Utc::now())
    .execute(pool)
    .await
    .expect("插入测试用户失败");
    id
}

/// 给用户插入一个 UPI 收款地址，返回其 ID
async fn seed_upi(pool: &PgPool, user_id: Uuid) -> Uuid {
    let handle = UpiHandle {
        id: Uuid::new_v4(),
        user_id,
        upi_address: format!("integ-{}@upi", user_id),
        is_default: true,
        created_at: Utc::now(),
    };
    ContactRepository::new(pool.clone())
        .create_upi_handle(&handle)
        .await
        .expect("插入 UPI 地址失败");
    handle.id
}

async fn get_balance(pool: &PgPool, user_id: Uuid) -> Decimal {
    sqlx::query_scalar::<_, Decimal>("SELECT cashback_balance FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("查询余额失败")
}

async fn count_ledger_entries(pool: &PgPool, user_id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cashback_ledger WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("查询流水数量失败")
}

fn upi_request(amount: Decimal, upi_id: Uuid) -> RedeemRequest {
    RedeemRequest {
        amount,
        method: RedemptionMethod::Upi,
        bank_account_id: None,
        upi_id: Some(upi_id),
    }
}

// ==================== 测试用例 ====================

/// 发起提现时余额原子扣减，请求创建为 Pending
#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_redemption_debits_balance_atomically() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let service = setup_service(&pool);

    let user_id = seed_user(&pool, Decimal::from(100)).await;
    let upi_id = seed_upi(&pool, user_id).await;

    let redemption = service
        .request_redemption(user_id, upi_request(Decimal::from(40), upi_id))
        .await
        .unwrap();

    assert_eq!(redemption.status, RedemptionStatus::Pending);
    assert_eq!(redemption.amount, Decimal::from(40));
    assert_eq!(get_balance(&pool, user_id).await, Decimal::from(60));
    assert_eq!(count_ledger_entries(&pool, user_id).await, 1);
}

/// 余额不足时整体失败：无请求记录、无流水、余额不变
#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_redemption_insufficient_balance_leaves_no_trace() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let service = setup_service(&pool);

    let user_id = seed_user(&pool, Decimal::from(30)).await;
    let upi_id = seed_upi(&pool, user_id).await;

    let err = service
        .request_redemption(user_id, upi_request(Decimal::from(50), upi_id))
        .await
        .unwrap_err();

    match err {
        CashbackError::InsufficientBalance {
            requested,
            available,
        } => {
            assert_eq!(requested, Decimal::from(50));
            assert_eq!(available, Decimal::from(30));
        }
        other => panic!("期望 InsufficientBalance，实际: {:?}", other),
    }

    assert_eq!(get_balance(&pool, user_id).await, Decimal::from(30));
    assert_eq!(count_ledger_entries(&pool, user_id).await, 0);
    assert!(service.list_redemptions(user_id).await.unwrap().is_empty());
}

/// UPI 提现必须携带 upi_id
#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_redemption_upi_without_handle_is_validation_error() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let service = setup_service(&pool);

    let user_id = seed_user(&pool, Decimal::from(100)).await;

    let request = RedeemRequest {
        amount: Decimal::from(10),
        method: RedemptionMethod::Upi,
        bank_account_id: None,
        upi_id: None,
    };
    let err = service.request_redemption(user_id, request).await.unwrap_err();
    assert!(matches!(err, CashbackError::Validation(_)));
}

/// 引用他人的收款方式等同于不存在
#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_redemption_rejects_foreign_payout_contact() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let service = setup_service(&pool);

    let owner = seed_user(&pool, Decimal::from(100)).await;
    let attacker = seed_user(&pool, Decimal::from(100)).await;
    let owner_upi = seed_upi(&pool, owner).await;

    let err = service
        .request_redemption(attacker, upi_request(Decimal::from(10), owner_upi))
        .await
        .unwrap_err();
    assert!(matches!(err, CashbackError::PayoutContactNotFound(_)));
    assert_eq!(get_balance(&pool, attacker).await, Decimal::from(100));
}

/// 打款状态推进：Pending -> Processing -> Completed，余额不再变动
#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_redemption_processing_then_completed() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let service = setup_service(&pool);

    let user_id = seed_user(&pool, Decimal::from(100)).await;
    let upi_id = seed_upi(&pool, user_id).await;

    let redemption = service
        .request_redemption(user_id, upi_request(Decimal::from(25), upi_id))
        .await
        .unwrap();

    let processing = service.mark_processing(redemption.id).await.unwrap();
    assert_eq!(processing.status, RedemptionStatus::Processing);

    let completed = service.mark_completed(redemption.id).await.unwrap();
    assert_eq!(completed.status, RedemptionStatus::Completed);
    assert!(completed.processed_at.is_some());

    // 完成不触碰余额
    assert_eq!(get_balance(&pool, user_id).await, Decimal::from(75));

    // 终态不可再推进
    let err = service.mark_processing(redemption.id).await.unwrap_err();
    assert!(matches!(err, CashbackError::InvalidRedemptionStatus { .. }));
}

/// 打款失败退回恰好一次
#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_mark_failed_refunds_exactly_once() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let service = setup_service(&pool);

    let user_id = seed_user(&pool, Decimal::from(100)).await;
    let upi_id = seed_upi(&pool, user_id).await;

    let redemption = service
        .request_redemption(user_id, upi_request(Decimal::from(40), upi_id))
        .await
        .unwrap();
    assert_eq!(get_balance(&pool, user_id).await, Decimal::from(60));

    let failed = service
        .mark_failed(redemption.id, "银行通道超时")
        .await
        .unwrap();
    assert_eq!(failed.status, RedemptionStatus::Failed);
    assert_eq!(failed.failure_reason.as_deref(), Some("银行通道超时"));
    assert_eq!(get_balance(&pool, user_id).await, Decimal::from(100));

    // 重复标记失败不会二次退款
    let err = service
        .mark_failed(redemption.id, "重复回调")
        .await
        .unwrap_err();
    assert!(matches!(err, CashbackError::InvalidRedemptionStatus { .. }));
    assert_eq!(get_balance(&pool, user_id).await, Decimal::from(100));

    // 扣减 + 退回两条流水
    assert_eq!(count_ledger_entries(&pool, user_id).await, 2);
}

/// 端到端：提交凭证 -> webhook 核销入账 -> 提现
#[tokio::test]
#[ignore = "需要 PostgreSQL"]
async fn test_claim_verify_redeem_round_trip() {
    use cashback_service::models::Product;
    use cashback_service::repository::{ProductRepository, TransactionRepository};
    use cashback_service::service::VerificationService;
    use cashback_service::service::dto::SubmitClaimRequest;

    let pool = PgPool::connect(&database_url()).await.unwrap();
    let redemption_service = setup_service(&pool);
    let verification_service = VerificationService::new(
        Arc::new(ProductRepository::new(pool.clone())),
        Arc::new(TransactionRepository::new(pool.clone())),
        pool.clone(),
    );

    let user_id = seed_user(&pool, Decimal::ZERO).await;
    let upi_id = seed_upi(&pool, user_id).await;

    let product = Product {
        id: Uuid::new_v4(),
        title: "Round Trip Product".to_string(),
        description: "integration test".to_string(),
        price: Decimal::from(200),
        image_url: "https://example.com/p.jpg".to_string(),
        merchant_url: "https://example.com/p".to_string(),
        category: "Electronics".to_string(),
        cashback_percent: Decimal::from_str("10.0").unwrap(),
        created_at: Utc::now(),
    };
    ProductRepository::new(pool.clone())
        .create(&product)
        .await
        .unwrap();

    let order_id = format!("ORD-{}", Uuid::new_v4());
    verification_service
        .submit_claim(
            user_id,
            SubmitClaimRequest {
                product_id: product.id,
                external_order_id: Some(order_id.clone()),
                amount: Decimal::from(200),
                evidence_url: None,
                idempotency_key: None,
            },
        )
        .await
        .unwrap();

    verification_service
        .verify_by_webhook(&order_id)
        .await
        .unwrap();
    // 200 × 10% = 20.00
    assert_eq!(
        get_balance(&pool, user_id).await,
        Decimal::from_str("20.00").unwrap()
    );

    let redemption = redemption_service
        .request_redemption(user_id, upi_request(Decimal::from(20), upi_id))
        .await
        .unwrap();
    assert_eq!(redemption.status, RedemptionStatus::Pending);
    assert_eq!(get_balance(&pool, user_id).await, Decimal::from_str("0.00").unwrap());

    // 入账 + 扣减两条流水
    assert_eq!(count_ledger_entries(&pool, user_id).await, 2);
}
