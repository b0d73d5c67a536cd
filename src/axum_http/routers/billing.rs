use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::accounts::clerk_client::ClerkClient;
use crate::auth::AuthUser;
use crate::axum_http::error_responses::{ErrorBody, entitlement_error_response};
use crate::domain::plan_tier::PlanTier;
use crate::payments::stripe_client::StripeClient;
use crate::usecases::entitlements::{BillingGateway, EntitlementStore, EntitlementUseCase};
use crate::usecases::plan_catalog::{BillingInterval, PlanCatalog};

pub fn routes(
    stripe: Arc<StripeClient>,
    accounts: Arc<ClerkClient>,
    catalog: Arc<PlanCatalog>,
) -> Router {
    let usecase = EntitlementUseCase::new(stripe, accounts, catalog);

    Router::new()
        .route("/plans", get(list_plans::<StripeClient, ClerkClient>))
        .route("/checkout", post(create_checkout::<StripeClient, ClerkClient>))
        .route("/webhook", post(handle_webhook::<StripeClient, ClerkClient>))
        .with_state(Arc::new(usecase))
}

pub async fn list_plans<B, S>(
    State(usecase): State<Arc<EntitlementUseCase<B, S>>>,
) -> impl IntoResponse
where
    B: BillingGateway + Send + Sync + 'static,
    S: EntitlementStore + Send + Sync + 'static,
{
    Json(usecase.list_plans())
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub plan: PlanTier,
    pub interval: BillingInterval,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

pub async fn create_checkout<B, S>(
    State(usecase): State<Arc<EntitlementUseCase<B, S>>>,
    auth: AuthUser,
    Json(body): Json<CheckoutRequest>,
) -> impl IntoResponse
where
    B: BillingGateway + Send + Sync + 'static,
    S: EntitlementStore + Send + Sync + 'static,
{
    match usecase
        .create_checkout(&auth.user_id, auth.email.clone(), body.plan, body.interval)
        .await
    {
        Ok(url) => (StatusCode::OK, Json(CheckoutResponse { url })).into_response(),
        Err(err) => entitlement_error_response(err, "billing: create checkout"),
    }
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// Signed webhook entry point. The raw body bytes go into signature
/// verification untouched; parsing happens only after the signature checks
/// out.
pub async fn handle_webhook<B, S>(
    State(usecase): State<Arc<EntitlementUseCase<B, S>>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse
where
    B: BillingGateway + Send + Sync + 'static,
    S: EntitlementStore + Send + Sync + 'static,
{
    let Some(signature) = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "missing stripe-signature header".to_string(),
            }),
        )
            .into_response();
    };

    match usecase.handle_billing_webhook(&body, signature).await {
        Ok(()) => (StatusCode::OK, Json(WebhookAck { received: true })).into_response(),
        Err(err) => entitlement_error_response(err, "billing: webhook"),
    }
}
