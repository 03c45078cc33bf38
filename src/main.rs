//! 餐厅点餐平台主入口

use resto_saas::{
    auth::SystemClock,
    cache::CacheFacade,
    config::AppConfig,
    db,
    handlers::health,
    middleware::{AppState, Stores},
    repository::PgRefreshTokenStore,
    routes, telemetry,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("resto-saas {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("未知参数: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 加载 .env 文件（开发环境）
    // 按优先级加载：.env.local > .env
    if let Ok(env) = std::env::var("RESTO_ENV") {
        dotenv::from_filename(format!(".env.{}", env)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::dotenv().ok();
    }

    health::set_start_time();

    // 1. 加载配置
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 日志
    telemetry::init_telemetry(&config.logging);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "resto-saas starting...");

    // 3. 数据库连接池 + 迁移
    let db_pool = db::create_pool(&config.database).await?;
    db::run_migrations(&db_pool).await?;
    tracing::info!("Database initialized");

    // 4. 缓存（Redis 不可用时回退到本地缓存）
    let cache = CacheFacade::from_config(&config.cache).await;
    tracing::info!(mode = cache.backend().mode(), "Cache initialized");

    // 5. 应用状态
    let stores = Stores::postgres(&db_pool);
    let state = AppState::new(
        config.clone(),
        db_pool.clone(),
        cache,
        Arc::new(SystemClock),
        stores,
    )?;
    let app = routes::create_router(Arc::new(state));

    // 连接池指标
    let metrics_pool = db_pool.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(15));
        loop {
            interval.tick().await;
            db::record_pool_metrics(&metrics_pool);
        }
    });

    // 过期刷新令牌清理
    let token_store = PgRefreshTokenStore::new(db_pool.clone());
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        loop {
            interval.tick().await;
            match token_store.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Expired refresh tokens removed"),
                Err(e) => tracing::warn!(error = %e, "Refresh token cleanup failed"),
            }
        }
    });

    // 6. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.graceful_shutdown_timeout_secs))
        .await?;

    db_pool.close().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
///
/// 收到信号后开始排空连接；超过时限仍未结束则强制退出。
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(timeout_secs)).await;
        tracing::warn!("Graceful shutdown timeout reached, forcing exit");
        std::process::exit(1);
    });
}

/// 打印帮助信息
fn print_help() {
    println!("resto-saas {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: resto-saas [选项]");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!();
    println!("环境变量:");
    println!("  所有配置通过 RESTO_ 前缀的环境变量完成，例如");
    println!("  RESTO_DATABASE__URL, RESTO_SECURITY__JWT_SECRET, RESTO_CACHE__REDIS_URL");
}
