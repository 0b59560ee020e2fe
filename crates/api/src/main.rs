use anyhow::Context;

use nursery_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nursery_observability::init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    if !config.use_persistent_stores {
        tracing::warn!("USE_PERSISTENT_STORES=false; plants will not survive a restart");
    }

    let app = nursery_api::app::build_app(&config)
        .await
        .context("failed to initialize plant store")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
