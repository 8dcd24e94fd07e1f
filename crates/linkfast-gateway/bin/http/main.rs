mod cli;

use crate::cli::{LogFormatArg, StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use linkfast_cache::{CacheConfig, MokaUrlCache};
use linkfast_core::Repository;
use linkfast_gateway::{App, AppState};
use linkfast_generator::HashGenerator;
use linkfast_redirector::{Redirector, RedirectorService};
use linkfast_shortener::{Shortener, ShortenerService};
use linkfast_storage::{InMemoryRepository, RedbConfig, RedbRepository};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    init_tracing(config.log_format);

    info!(
        host = %config.host,
        port = config.port,
        base_url = %config.base_url(),
        storage_backend = %config.storage,
        "starting linkfast http server"
    );

    match config.storage {
        StorageBackendArg::Redb => {
            let repository = RedbRepository::open(
                RedbConfig::builder()
                    .path(config.db_path.clone())
                    .open_timeout(config.db_open_timeout())
                    .build(),
            )
            .await
            .with_context(|| format!("failed to open database {}", config.db_path.display()))?;
            run_server(config, Arc::new(repository)).await
        }
        StorageBackendArg::InMemory => {
            run_server(config, Arc::new(InMemoryRepository::new())).await
        }
    }
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormatArg::Pretty => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

async fn run_server<R: Repository>(config: CLI, repository: Arc<R>) -> anyhow::Result<()> {
    let cache: Arc<MokaUrlCache> = Arc::new(
        CacheConfig::builder()
            .max_capacity(config.cache_capacity)
            .default_ttl(config.cache_ttl())
            .build()
            .into(),
    );
    let cleanup = cache.spawn_cleanup(config.cache_cleanup_interval());

    let shortener: Arc<dyn Shortener> = Arc::new(ShortenerService::new(
        Arc::clone(&repository),
        Arc::clone(&cache),
        HashGenerator::new(),
    ));
    let redirector = Arc::new(RedirectorService::new(
        Arc::clone(&repository),
        Arc::clone(&cache),
    ));

    let state = AppState::new(
        shortener,
        Arc::clone(&redirector) as Arc<dyn Redirector>,
        config.base_url(),
    );
    let app = App::router(state, config.request_timeout());

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(pending_clicks = redirector.clicks().pending(), "draining click updates");
    redirector.shutdown().await;
    cleanup.stop();
    drop(repository);
    info!("shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received");
}
