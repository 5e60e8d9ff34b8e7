//! Match-cascade HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use match_cascade::cache::{CacheManager, EphemeralTier, FileDurableStore};
use match_cascade::cascade::CascadeExecutor;
use match_cascade::config::EngineConfig;
use match_cascade::gateway::{GatewayState, create_router};
use match_cascade::orchestrator::AnalysisOrchestrator;
use match_cascade::provider::{GenaiProvider, ProviderClient};
use match_cascade::telemetry::EngineMetrics;
use match_cascade::validation::QualityValidator;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = EngineConfig::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    let policy = config.cascade_policy();
    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        low_cost = ?config.low_cost_providers,
        premium = %config.premium_provider,
        cascade_enabled = config.cascade_enabled,
        escalation_budget_secs = policy.escalation_budget.as_secs(),
        backoff_ceiling_secs = policy.backoff_ceiling(config.low_cost_providers.len()).as_secs(),
        "Match cascade starting"
    );

    let durable = FileDurableStore::new(config.storage_path.clone());
    if let Err(e) = durable.ensure_root().await {
        tracing::warn!(error = %e, "Durable cache directory unavailable, continuing without it");
    }

    let cache = Arc::new(CacheManager::new(
        EphemeralTier::with_capacity(config.ephemeral_capacity),
        durable,
        config.ephemeral_ttl,
    ));

    let low_cost: Vec<Arc<dyn ProviderClient>> = config
        .low_cost_providers
        .iter()
        .map(|model| {
            Arc::new(GenaiProvider::new(
                model.clone(),
                config.low_cost_call_cost_micros,
                &config.weights,
            )) as Arc<dyn ProviderClient>
        })
        .collect();
    let premium: Arc<dyn ProviderClient> = Arc::new(GenaiProvider::new(
        config.premium_provider.clone(),
        config.premium_call_cost_micros,
        &config.weights,
    ));

    let orchestrator = AnalysisOrchestrator::new(
        cache,
        CascadeExecutor::new(policy, QualityValidator::new(config.weights.clone())),
        low_cost,
        premium,
        config.orchestrator_options(),
        Arc::new(EngineMetrics::new()),
    );

    let app = create_router(GatewayState::new(Arc::new(orchestrator)));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Match cascade shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("MATCH_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    check_health(port).await
}

async fn check_health(port: u16) -> i32 {
    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_runs_inside_the_server_runtime() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let app = axum::Router::new().route("/healthz", axum::routing::get(|| async { "ok" }));
        tokio::spawn(async move { axum::serve(listener, app).await });

        assert_eq!(check_health(port).await, 0);
    }

    #[tokio::test]
    async fn test_health_check_fails_without_a_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        assert_eq!(check_health(port).await, 1);
    }
}
