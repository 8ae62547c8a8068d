use anyhow::{Context, Result};
use voyage_api::{build_app, AppConfig};
use voyage_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing("voyage_api");

    let config = AppConfig::from_env().context("invalid configuration")?;
    let bind = config.service.bind.clone();

    let app = build_app(config).await?;

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(bind = %bind, "voyage planner api started");

    axum::serve(listener, app).await?;
    Ok(())
}
