use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    accounts::clerk_client::ClerkClient,
    axum_http::{default_routers, routers},
    config::config_model::DotEnvyConfig,
    payments::stripe_client::StripeClient,
    usecases::{access_guard::RouteGuard, plan_catalog::PlanCatalog},
};

pub async fn start(config: Arc<DotEnvyConfig>) -> Result<()> {
    // External clients are constructed once here and injected; credentials
    // were already validated by the config loader.
    let stripe = Arc::new(StripeClient::new(
        config.stripe.secret_key.clone(),
        config.stripe.webhook_secret.clone(),
        config.stripe.success_url.clone(),
        config.stripe.cancel_url.clone(),
    ));
    let accounts = Arc::new(ClerkClient::new(
        config.accounts.api_key.clone(),
        config.accounts.base_url.clone(),
    ));
    let catalog = Arc::new(PlanCatalog::from_config(&config.plans));
    let guard = Arc::new(RouteGuard::new(
        Arc::clone(&accounts),
        config.guard.fallback_path.clone(),
    ));

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest(
            "/api/v1/billing",
            routers::billing::routes(
                Arc::clone(&stripe),
                Arc::clone(&accounts),
                Arc::clone(&catalog),
            ),
        )
        .nest("/api/v1/me", routers::access::routes(Arc::clone(&guard)))
        .nest("/api/v1/analysis", routers::analysis::routes(guard))
        .nest(
            "/api/v1/admin",
            routers::admin::routes(stripe, accounts, catalog),
        )
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout)))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
