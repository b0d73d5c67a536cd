use std::sync::Arc;

use axum::{
    Json, Router, async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{StatusCode, request::Parts},
    response::IntoResponse,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::accounts::clerk_client::ClerkClient;
use crate::axum_http::error_responses::{ApiError, entitlement_error_response};
use crate::config::config_loader;
use crate::domain::plan_tier::PlanTier;
use crate::payments::stripe_client::StripeClient;
use crate::usecases::entitlements::{BillingGateway, EntitlementStore, EntitlementUseCase};
use crate::usecases::plan_catalog::PlanCatalog;

/// Manual-override surface: key-protected, bypasses the payment provider.
pub fn routes(
    stripe: Arc<StripeClient>,
    accounts: Arc<ClerkClient>,
    catalog: Arc<PlanCatalog>,
) -> Router {
    let usecase = EntitlementUseCase::new(stripe, accounts, catalog);

    Router::new()
        .route("/users", get(list_users::<StripeClient, ClerkClient>))
        .route(
            "/users/:user_id/plan",
            put(set_user_plan::<StripeClient, ClerkClient>),
        )
        .with_state(Arc::new(usecase))
}

fn admin_key_matches(provided: &str, expected: &str) -> bool {
    bool::from(provided.as_bytes().ct_eq(expected.as_bytes()))
}

/// Extractor proving the request carried the configured admin key.
pub struct AdminKey;

#[async_trait]
impl<S> FromRequestParts<S> for AdminKey
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get("x-admin-key")
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let expected = config_loader::get_admin_secret().map_err(|_| ApiError::Unauthorized)?;

        if !admin_key_matches(provided, &expected.api_key) {
            return Err(ApiError::Unauthorized);
        }

        Ok(AdminKey)
    }
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub async fn list_users<B, S>(
    State(usecase): State<Arc<EntitlementUseCase<B, S>>>,
    _admin: AdminKey,
    Query(query): Query<ListUsersQuery>,
) -> impl IntoResponse
where
    B: BillingGateway + Send + Sync + 'static,
    S: EntitlementStore + Send + Sync + 'static,
{
    match usecase
        .list_entitlements(query.limit.unwrap_or(50), query.offset.unwrap_or(0))
        .await
    {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(err) => entitlement_error_response(err, "admin: list users"),
    }
}

#[derive(Debug, Deserialize)]
pub struct SetPlanRequest {
    pub plan: PlanTier,
}

#[derive(Debug, Serialize)]
pub struct SetPlanResponse {
    pub user_id: String,
    pub plan: PlanTier,
}

pub async fn set_user_plan<B, S>(
    State(usecase): State<Arc<EntitlementUseCase<B, S>>>,
    _admin: AdminKey,
    Path(user_id): Path<String>,
    Json(body): Json<SetPlanRequest>,
) -> impl IntoResponse
where
    B: BillingGateway + Send + Sync + 'static,
    S: EntitlementStore + Send + Sync + 'static,
{
    match usecase.force_set_plan(&user_id, body.plan).await {
        Ok(()) => (
            StatusCode::OK,
            Json(SetPlanResponse {
                user_id,
                plan: body.plan,
            }),
        )
            .into_response(),
        Err(err) => entitlement_error_response(err, "admin: set user plan"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_key_comparison_is_exact() {
        assert!(admin_key_matches("adm_secret", "adm_secret"));
        assert!(!admin_key_matches("adm_secret", "adm_secret2"));
        assert!(!admin_key_matches("", "adm_secret"));
    }
}
