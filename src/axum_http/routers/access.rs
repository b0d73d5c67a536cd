use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::accounts::clerk_client::ClerkClient;
use crate::auth::AuthUser;
use crate::domain::plan_tier::PlanTier;
use crate::usecases::access_guard::{AccessDecision, RouteGuard, check_access, required_tier};
use crate::usecases::entitlements::EntitlementStore;

pub fn routes(guard: Arc<RouteGuard<ClerkClient>>) -> Router {
    Router::new()
        .route("/entitlement", get(current_entitlement::<ClerkClient>))
        .route("/access", get(feature_access::<ClerkClient>))
        .with_state(guard)
}

#[derive(Debug, Serialize)]
pub struct EntitlementResponse {
    pub user_id: String,
    pub plan: PlanTier,
}

pub async fn current_entitlement<S>(
    State(guard): State<Arc<RouteGuard<S>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    S: EntitlementStore + Send + Sync + 'static,
{
    let plan = guard.resolve_tier(&auth).await;
    Json(EntitlementResponse {
        user_id: auth.user_id,
        plan,
    })
}

#[derive(Debug, Deserialize)]
pub struct FeatureAccessQuery {
    pub feature: String,
}

/// Presentation-level guard payload: when access is denied the client renders
/// a locked placeholder pointing at `upgrade_path` instead of the content.
#[derive(Debug, Serialize)]
pub struct FeatureAccessResponse {
    pub feature: String,
    pub current_plan: PlanTier,
    pub required_plan: PlanTier,
    pub granted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_path: Option<String>,
}

pub async fn feature_access<S>(
    State(guard): State<Arc<RouteGuard<S>>>,
    auth: AuthUser,
    Query(query): Query<FeatureAccessQuery>,
) -> impl IntoResponse
where
    S: EntitlementStore + Send + Sync + 'static,
{
    let current = guard.resolve_tier(&auth).await;
    Json(feature_access_response(
        query.feature,
        current,
        guard.fallback_path(),
    ))
}

fn feature_access_response(
    feature: String,
    current: PlanTier,
    fallback_path: &str,
) -> FeatureAccessResponse {
    let required = required_tier(&feature);

    match check_access(current, required) {
        AccessDecision::Granted => FeatureAccessResponse {
            feature,
            current_plan: current,
            required_plan: required,
            granted: true,
            upgrade_path: None,
        },
        AccessDecision::Locked { required } => FeatureAccessResponse {
            feature,
            current_plan: current,
            required_plan: required,
            granted: false,
            upgrade_path: Some(fallback_path.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn locked_payload_carries_required_plan_and_upgrade_path() {
        let response =
            feature_access_response("forecasting".to_string(), PlanTier::Pro, "/pricing");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "feature": "forecasting",
                "current_plan": "pro",
                "required_plan": "elite",
                "granted": false,
                "upgrade_path": "/pricing"
            })
        );
    }

    #[test]
    fn granted_payload_omits_upgrade_path() {
        let response =
            feature_access_response("forecasting".to_string(), PlanTier::Gold, "/pricing");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["granted"], json!(true));
        assert_eq!(value["required_plan"], json!("elite"));
        assert!(value.get("upgrade_path").is_none());
    }
}
