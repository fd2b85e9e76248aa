use clap::Parser;
use competitor_scout::utils::error::ErrorSeverity;
use competitor_scout::utils::{logger, validation::Validate};
use competitor_scout::{build_scan, router, CliConfig};
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "competitor-scout")]
#[command(about = "Returns competitor domains and their ranked keywords")]
struct ServerArgs {
    #[command(flatten)]
    config: CliConfig,
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();

    // 初始化日誌
    logger::init_logger(args.config.verbose, args.config.log_json);
    tracing::info!("Starting competitor-scout server");

    // 載入並驗證設定
    let config = match args.config.resolve().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration error: {} (Severity: {:?})", e, e.severity());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(exit_code(e.severity()));
        }
    };
    tracing::debug!("Resolved config: {:?}", config);
    config.warn_missing_credentials();

    let config = Arc::new(config);
    let scan = Arc::new(build_scan(Arc::clone(&config))?);
    let app = router(scan);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!(
        "🚀 Listening on http://{} (model: {}, {} competitors per request)",
        listener.local_addr()?,
        config.model,
        config.competitor_count
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
