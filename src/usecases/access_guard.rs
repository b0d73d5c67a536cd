use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, warn};

use crate::auth::AuthUser;
use crate::domain::plan_tier::PlanTier;
use crate::usecases::entitlements::EntitlementStore;

/// Product features gated by plan, lowest required tier first.
pub const FEATURES: [(&str, PlanTier); 8] = [
    ("overview", PlanTier::Free),
    ("price_history", PlanTier::Free),
    ("valuation_dashboard", PlanTier::Pro),
    ("financial_statements", PlanTier::Pro),
    ("forecasting", PlanTier::Elite),
    ("peer_comparison", PlanTier::Elite),
    ("pdf_export", PlanTier::Gold),
    ("analysis_diary", PlanTier::Gold),
];

/// Unknown features require the top tier.
pub fn required_tier(feature: &str) -> PlanTier {
    FEATURES
        .iter()
        .find(|(name, _)| *name == feature)
        .map(|(_, tier)| *tier)
        .unwrap_or(PlanTier::Gold)
}

pub fn unlocked_features(tier: PlanTier) -> Vec<&'static str> {
    FEATURES
        .iter()
        .filter(|(_, required)| tier >= *required)
        .map(|(name, _)| *name)
        .collect()
}

/// Outcome of a presentation-level access check: either render the protected
/// content, or render a locked placeholder with an upgrade call-to-action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    Locked { required: PlanTier },
}

/// `current >= required` under the tier total order is the sole condition
/// for granting access.
pub fn check_access(current: PlanTier, required: PlanTier) -> AccessDecision {
    if current >= required {
        AccessDecision::Granted
    } else {
        AccessDecision::Locked { required }
    }
}

/// Request-level guard state. Resolves the caller's current tier from the
/// session claim when present, otherwise from a fresh lookup against the
/// account store; both are equivalent sources of truth.
pub struct RouteGuard<S>
where
    S: EntitlementStore + Send + Sync + 'static,
{
    store: Arc<S>,
    fallback_path: String,
}

impl<S> RouteGuard<S>
where
    S: EntitlementStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, fallback_path: String) -> Self {
        Self {
            store,
            fallback_path,
        }
    }

    pub fn fallback_path(&self) -> &str {
        &self.fallback_path
    }

    pub async fn resolve_tier(&self, auth: &AuthUser) -> PlanTier {
        if let Some(plan) = auth.plan {
            debug!(user_id = %auth.user_id, plan = %plan, "access_guard: tier from session claim");
            return plan;
        }

        match self.store.fetch_user(&auth.user_id).await {
            Ok(user) => {
                debug!(user_id = %auth.user_id, plan = %user.plan, "access_guard: tier from account store");
                user.plan
            }
            Err(err) => {
                // Fail closed: an unreachable store grants no entitlement.
                warn!(
                    user_id = %auth.user_id,
                    error = ?err,
                    "access_guard: tier lookup failed, treating user as free"
                );
                PlanTier::Free
            }
        }
    }
}

/// Route-level guard middleware: unauthenticated and free-tier callers are
/// redirected to the fallback path. Pure read plus a redirect decision.
pub async fn require_paid<S>(
    State(guard): State<Arc<RouteGuard<S>>>,
    auth: Option<AuthUser>,
    request: Request,
    next: Next,
) -> Response
where
    S: EntitlementStore + Send + Sync + 'static,
{
    let Some(auth) = auth else {
        debug!("access_guard: unauthenticated request, redirecting to fallback");
        return Redirect::to(guard.fallback_path()).into_response();
    };

    let tier = guard.resolve_tier(&auth).await;
    if !tier.is_paid() {
        debug!(user_id = %auth.user_id, "access_guard: free tier, redirecting to fallback");
        return Redirect::to(guard.fallback_path()).into_response();
    }

    next.run(request).await
}
