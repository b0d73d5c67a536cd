use std::sync::Arc;

use axum::{Json, Router, extract::State, middleware, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::accounts::clerk_client::ClerkClient;
use crate::auth::AuthUser;
use crate::domain::plan_tier::PlanTier;
use crate::usecases::access_guard::{RouteGuard, require_paid, unlocked_features};
use crate::usecases::entitlements::EntitlementStore;

/// Paid-only workspace surface. The route-level guard redirects
/// unauthenticated and free-tier callers to the configured fallback path
/// before any handler runs.
pub fn routes(guard: Arc<RouteGuard<ClerkClient>>) -> Router {
    Router::new()
        .route("/overview", get(overview::<ClerkClient>))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&guard),
            require_paid::<ClerkClient>,
        ))
        .with_state(guard)
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub plan: PlanTier,
    pub features: Vec<&'static str>,
}

pub async fn overview<S>(
    State(guard): State<Arc<RouteGuard<S>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    S: EntitlementStore + Send + Sync + 'static,
{
    let plan = guard.resolve_tier(&auth).await;
    Json(OverviewResponse {
        plan,
        features: unlocked_features(plan),
    })
}
