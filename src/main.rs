use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use voucher_gateway::domain::ports::SystemClock;
use voucher_gateway::utils::{logger, validation::Validate};
use voucher_gateway::{AppConfig, CliArgs, HttpProcedureTransport, VoucherApp};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let mut config = match AppConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // 初始化日誌
    let logging = config.logging.clone().unwrap_or_default();
    if args.json_logs || logging.json {
        logger::init_json_logger(args.verbose, logging.level.as_deref());
    } else {
        logger::init_cli_logger(args.verbose, logging.level.as_deref());
    }

    tracing::info!("Starting voucher-gateway");

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let app = VoucherApp::assemble(&config, HttpProcedureTransport::new(), Arc::new(SystemClock));

    // 啟動時先解析資料來源，停用狀態下服務照常啟動
    let state = app.gateway.ensure_ready().await;
    tracing::info!("🔌 Procedure gateway state: {}", state.as_str());

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    tracing::info!("🚀 Listening on {}", address);

    axum::serve(listener, app.router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("✅ Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown signal received");
}
