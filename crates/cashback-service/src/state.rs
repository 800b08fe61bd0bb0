//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::JwtManager;
use crate::repository::{
    ContactRepository, LedgerRepository, ProductRepository, RedemptionRepository,
    TransactionRepository, UserRepository,
};
use crate::service::{CashbackQueryService, RedemptionService, VerificationService};

/// 只读查询服务的具体化类型
pub type QueryService = CashbackQueryService<
    UserRepository,
    TransactionRepository,
    RedemptionRepository,
    LedgerRepository,
>;

/// Axum 应用共享状态
///
/// 仓储与服务都包在 Arc 里，在 handler 间共享
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL 连接池
    pub pool: PgPool,
    /// JWT 管理器
    pub jwt_manager: Arc<JwtManager>,
    /// 签发 Token 时授予人工核销权限的运营邮箱
    pub verifier_emails: Arc<Vec<String>>,
    pub user_repo: Arc<UserRepository>,
    pub product_repo: Arc<ProductRepository>,
    pub contact_repo: Arc<ContactRepository>,
    pub verification_service: Arc<VerificationService>,
    pub redemption_service: Arc<RedemptionService>,
    pub query_service: Arc<QueryService>,
}

impl AppState {
    /// 从连接池和 JWT 管理器装配全部仓储与服务
    pub fn new(pool: PgPool, jwt_manager: JwtManager, verifier_emails: Vec<String>) -> Self {
        let user_repo = Arc::new(UserRepository::new(pool.clone()));
        let product_repo = Arc::new(ProductRepository::new(pool.clone()));
        let transaction_repo = Arc::new(TransactionRepository::new(pool.clone()));
        let redemption_repo = Arc::new(RedemptionRepository::new(pool.clone()));
        let ledger_repo = Arc::new(LedgerRepository::new(pool.clone()));
        let contact_repo = Arc::new(ContactRepository::new(pool.clone()));

        let verification_service = Arc::new(VerificationService::new(
            product_repo.clone(),
            transaction_repo.clone(),
            pool.clone(),
        ));
        let redemption_service = Arc::new(RedemptionService::new(
            redemption_repo.clone(),
            contact_repo.clone(),
            pool.clone(),
        ));
        let query_service = Arc::new(CashbackQueryService::new(
            user_repo.clone(),
            transaction_repo,
            redemption_repo,
            ledger_repo,
        ));

        Self {
            pool,
            jwt_manager: Arc::new(jwt_manager),
            verifier_emails: Arc::new(verifier_emails),
            user_repo,
            product_repo,
            contact_repo,
            verification_service,
            redemption_service,
            query_service,
        }
    }
}
