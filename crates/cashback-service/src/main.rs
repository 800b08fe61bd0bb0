//! 返现服务入口
//!
//! 加载配置、初始化可观测性与数据库连接，启动 HTTP 服务。

use cashback_service::auth::{JwtConfig, JwtManager};
use cashback_service::routes::create_router;
use cashback_service::state::AppState;
use cashx_shared::{config::AppConfig, database::Database, observability};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 统一加载配置：config/*.toml + CASHX_ 环境变量覆盖
    let config = AppConfig::load("cashback-service").unwrap_or_default();

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config)?;

    info!("Starting cashback-service on {}", config.server_addr());

    // JWT 密钥：生产环境必须通过 CASHX_JWT_SECRET 注入
    if config.auth.secret == "cashx-secret-key-change-in-production" {
        if config.is_production() {
            panic!("CASHX_JWT_SECRET must be set in production environment");
        }
        warn!("Using default JWT secret - set CASHX_JWT_SECRET for production");
    }

    let db = Database::connect(&config.database).await?;

    // 启动时自动执行 migrations/ 下未应用的迁移
    sqlx::migrate!("./migrations").run(db.pool()).await?;
    info!("Database migrations applied");

    let jwt_manager = JwtManager::new(JwtConfig {
        secret: config.auth.secret.clone(),
        expires_in_secs: config.auth.token_ttl_seconds,
        issuer: "cashback-service".to_string(),
    });

    let state = AppState::new(
        db.pool().clone(),
        jwt_manager,
        config.auth.verifier_emails.clone(),
    );
    let app = create_router(state);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("cashback-service listening on {}", config.server_addr());

    axum::serve(listener, app).await?;

    Ok(())
}
