pub mod accounts;
pub mod auth;
pub mod axum_http;
pub mod config;
pub mod domain;
pub mod payments;
pub mod usecases;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub async fn run() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let dotenvy_env = config::config_loader::load()?;
    info!("ENV has been loaded");

    axum_http::http_serve::start(Arc::new(dotenvy_env)).await?;

    Ok(())
}
