use std::sync::Arc;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::accounts::clerk_client::{AccountUser, ClerkClient};
use crate::domain::plan_tier::PlanTier;
use crate::domain::subscription_event::SubscriptionEvent;
use crate::payments::stripe_client::{StripeClient, StripeEvent};
use crate::usecases::plan_catalog::{BillingInterval, PlanCatalog, PlanDto};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BillingGateway: Send + Sync {
    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> AnyResult<StripeEvent>;

    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> AnyResult<crate::payments::stripe_client::StripeSubscriptionObject>;

    async fn create_checkout_session(
        &self,
        price_id: &str,
        user_id: &str,
        customer_email: Option<String>,
    ) -> AnyResult<String>;
}

#[async_trait]
impl BillingGateway for StripeClient {
    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> AnyResult<StripeEvent> {
        self.verify_webhook_signature(payload, signature)
    }

    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> AnyResult<crate::payments::stripe_client::StripeSubscriptionObject> {
        self.retrieve_subscription(subscription_id).await
    }

    async fn create_checkout_session(
        &self,
        price_id: &str,
        user_id: &str,
        customer_email: Option<String>,
    ) -> AnyResult<String> {
        self.create_checkout_session(price_id, user_id, customer_email)
            .await
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntitlementStore: Send + Sync {
    async fn set_plan(&self, user_id: &str, tier: PlanTier) -> AnyResult<()>;

    async fn fetch_user(&self, user_id: &str) -> AnyResult<AccountUser>;

    async fn list_users(&self, limit: u32, offset: u32) -> AnyResult<Vec<AccountUser>>;
}

#[async_trait]
impl EntitlementStore for ClerkClient {
    async fn set_plan(&self, user_id: &str, tier: PlanTier) -> AnyResult<()> {
        self.set_plan(user_id, tier).await
    }

    async fn fetch_user(&self, user_id: &str) -> AnyResult<AccountUser> {
        self.fetch_user(user_id).await
    }

    async fn list_users(&self, limit: u32, offset: u32) -> AnyResult<Vec<AccountUser>> {
        self.list_users(limit, offset).await
    }
}

#[derive(Debug, Error)]
pub enum EntitlementError {
    #[error("webhook signature verification failed")]
    InvalidSignature,
    #[error("plan has no configured price: {0}")]
    MissingPrice(String),
    #[error("invalid checkout request: {0}")]
    InvalidCheckout(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl EntitlementError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            EntitlementError::InvalidSignature
            | EntitlementError::MissingPrice(_)
            | EntitlementError::InvalidCheckout(_) => StatusCode::BAD_REQUEST,
            EntitlementError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, EntitlementError>;

/// Synchronizes subscription lifecycle events from the payment provider into
/// the auth provider's user metadata, and serves the billing surface built on
/// top of it (plan listing, checkout creation, admin overrides).
pub struct EntitlementUseCase<B, S>
where
    B: BillingGateway + Send + Sync + 'static,
    S: EntitlementStore + Send + Sync + 'static,
{
    billing: Arc<B>,
    store: Arc<S>,
    catalog: Arc<PlanCatalog>,
}

impl<B, S> EntitlementUseCase<B, S>
where
    B: BillingGateway + Send + Sync + 'static,
    S: EntitlementStore + Send + Sync + 'static,
{
    pub fn new(billing: Arc<B>, store: Arc<S>, catalog: Arc<PlanCatalog>) -> Self {
        Self {
            billing,
            store,
            catalog,
        }
    }

    pub fn list_plans(&self) -> Vec<PlanDto> {
        self.catalog.plans().iter().map(PlanDto::from).collect()
    }

    /// Entry point for `POST /billing/webhook`: verify, classify, apply.
    ///
    /// At most one entitlement write happens per event. Signature failures
    /// fail closed with no side effects; a downstream subscription-lookup
    /// failure surfaces as an internal error so the provider retries the
    /// whole event.
    pub async fn handle_billing_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> UseCaseResult<()> {
        let event = self
            .billing
            .verify_webhook_signature(payload, signature)
            .map_err(|err| {
                warn!(error = %err, "entitlements: webhook signature verification failed");
                EntitlementError::InvalidSignature
            })?;

        let event_id = event.id.clone().unwrap_or_default();
        info!(
            event_id = %event_id,
            event_type = %event.type_,
            "entitlements: webhook verified"
        );

        match classify(&event, &self.catalog) {
            SubscriptionEvent::CheckoutCompleted {
                user_id,
                subscription_id,
            } => {
                self.handle_checkout_completed(&event_id, user_id, subscription_id)
                    .await?;
            }
            SubscriptionEvent::SubscriptionUpdated {
                user_id,
                tier,
                status,
            } => {
                if status != "active" {
                    info!(
                        event_id = %event_id,
                        subscription_status = %status,
                        plan = %tier,
                        "entitlements: subscription not active, entitlement unchanged"
                    );
                    return Ok(());
                }
                self.write_entitlement(user_id.as_deref(), tier).await;
            }
            SubscriptionEvent::SubscriptionDeleted { user_id } => {
                self.write_entitlement(user_id.as_deref(), PlanTier::Free)
                    .await;
            }
            SubscriptionEvent::PaymentFailed { subscription_id } => {
                // Grace period policy: entitlement is revoked only on explicit
                // subscription deletion.
                warn!(
                    event_id = %event_id,
                    subscription_id = ?subscription_id,
                    "entitlements: payment failed, keeping current entitlement"
                );
            }
            SubscriptionEvent::Unhandled { kind } => {
                debug!(event_id = %event_id, event_type = %kind, "entitlements: unhandled event type");
            }
        }

        Ok(())
    }

    async fn handle_checkout_completed(
        &self,
        event_id: &str,
        user_id: Option<String>,
        subscription_id: Option<String>,
    ) -> UseCaseResult<()> {
        let Some(user_id) = user_id else {
            // Cannot grant entitlement to an unknown user; not an error.
            warn!(
                event_id = %event_id,
                "entitlements: checkout completed without a user id, skipping"
            );
            return Ok(());
        };

        let Some(subscription_id) = subscription_id else {
            // Payment-mode sessions carry no subscription; nothing to grant.
            warn!(
                event_id = %event_id,
                user_id = %user_id,
                "entitlements: checkout session has no subscription id, skipping"
            );
            return Ok(());
        };

        let subscription = self
            .billing
            .retrieve_subscription(&subscription_id)
            .await
            .map_err(|err| {
                error!(
                    event_id = %event_id,
                    user_id = %user_id,
                    subscription_id = %subscription_id,
                    error = ?err,
                    "entitlements: failed to retrieve subscription from provider"
                );
                EntitlementError::Internal(err)
            })?;

        let tier = self
            .catalog
            .resolve(subscription.price_id().unwrap_or_default());

        info!(
            event_id = %event_id,
            user_id = %user_id,
            subscription_id = %subscription_id,
            plan = %tier,
            "entitlements: checkout completed, granting plan"
        );

        self.write_entitlement(Some(&user_id), tier).await;
        Ok(())
    }

    /// Best-effort, at-most-one-attempt write of the resolved tier.
    ///
    /// Failures are logged and swallowed so the webhook is still
    /// acknowledged; the write is idempotent and a later event corrects the
    /// stored tier.
    async fn write_entitlement(&self, user_id: Option<&str>, tier: PlanTier) {
        let Some(user_id) = user_id else {
            warn!(plan = %tier, "entitlements: no user id on event, skipping entitlement write");
            return;
        };

        info!(user_id, plan = %tier, "entitlements: writing plan to account store");
        if let Err(err) = self.store.set_plan(user_id, tier).await {
            error!(
                user_id,
                plan = %tier,
                error = ?err,
                "entitlements: plan write failed, webhook still acknowledged"
            );
        }
    }

    pub async fn create_checkout(
        &self,
        user_id: &str,
        user_email: Option<String>,
        tier: PlanTier,
        interval: BillingInterval,
    ) -> UseCaseResult<String> {
        if tier == PlanTier::Free {
            let err = EntitlementError::InvalidCheckout("free plan does not require checkout");
            warn!(
                user_id,
                status = err.status_code().as_u16(),
                "entitlements: free plan checkout attempted"
            );
            return Err(err);
        }

        let price_id = self.catalog.price_for(tier, interval).ok_or_else(|| {
            let err = EntitlementError::MissingPrice(format!("{} {}", tier, interval));
            warn!(
                user_id,
                plan = %tier,
                interval = %interval,
                status = err.status_code().as_u16(),
                "entitlements: no price configured for requested plan"
            );
            err
        })?;

        info!(
            user_id,
            plan = %tier,
            interval = %interval,
            price_id = %price_id,
            "entitlements: creating checkout session"
        );

        let checkout_url = self
            .billing
            .create_checkout_session(price_id, user_id, user_email)
            .await
            .map_err(|err| {
                error!(
                    user_id,
                    plan = %tier,
                    price_id = %price_id,
                    error = ?err,
                    "entitlements: checkout session creation failed"
                );
                EntitlementError::Internal(err)
            })?;

        Ok(checkout_url)
    }

    pub async fn list_entitlements(
        &self,
        limit: u32,
        offset: u32,
    ) -> UseCaseResult<Vec<AccountUser>> {
        self.store.list_users(limit, offset).await.map_err(|err| {
            error!(limit, offset, error = ?err, "entitlements: failed to list users");
            EntitlementError::Internal(err)
        })
    }

    /// Manual override bypassing the payment provider. Unlike the webhook
    /// path, a failed write here surfaces to the caller.
    pub async fn force_set_plan(&self, user_id: &str, tier: PlanTier) -> UseCaseResult<()> {
        info!(user_id, plan = %tier, "entitlements: admin override of stored plan");
        self.store.set_plan(user_id, tier).await.map_err(|err| {
            error!(
                user_id,
                plan = %tier,
                error = ?err,
                "entitlements: admin plan override failed"
            );
            EntitlementError::Internal(err)
        })
    }
}

/// Classifies a verified provider event into a [`SubscriptionEvent`].
///
/// Classification never fails: payload shapes that do not match simply
/// produce a variant with absent fields, which downstream handling treats as
/// a no-op. Unknown event types map to `Unhandled`.
fn classify(event: &StripeEvent, catalog: &PlanCatalog) -> SubscriptionEvent {
    match event.type_.as_str() {
        "checkout.session.completed" => {
            let session = StripeClient::extract_checkout_session(event);
            let user_id = session.as_ref().and_then(|session| {
                session
                    .metadata
                    .as_ref()
                    .and_then(|metadata| metadata.get("user_id").cloned())
                    .or_else(|| session.client_reference_id.clone())
            });
            SubscriptionEvent::CheckoutCompleted {
                user_id,
                subscription_id: session.and_then(|session| session.subscription),
            }
        }
        "customer.subscription.updated" => {
            let subscription = StripeClient::extract_subscription(event);
            let (user_id, tier, status) = match subscription {
                Some(subscription) => (
                    subscription.user_id().map(str::to_string),
                    catalog.resolve(subscription.price_id().unwrap_or_default()),
                    subscription.status.clone().unwrap_or_default(),
                ),
                None => (None, catalog.resolve(""), String::new()),
            };
            SubscriptionEvent::SubscriptionUpdated {
                user_id,
                tier,
                status,
            }
        }
        "customer.subscription.deleted" => {
            let subscription = StripeClient::extract_subscription(event);
            SubscriptionEvent::SubscriptionDeleted {
                user_id: subscription
                    .as_ref()
                    .and_then(|subscription| subscription.user_id().map(str::to_string)),
            }
        }
        "invoice.payment_failed" => {
            #[derive(serde::Deserialize)]
            struct InvoiceObject {
                subscription: Option<String>,
            }
            let invoice: Option<InvoiceObject> =
                serde_json::from_value(event.data.object.clone()).ok();
            SubscriptionEvent::PaymentFailed {
                subscription_id: invoice.and_then(|invoice| invoice.subscription),
            }
        }
        other => SubscriptionEvent::Unhandled {
            kind: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_model::PlanPrices;
    use crate::payments::stripe_client::StripeEventData;
    use anyhow::anyhow;
    use serde_json::json;

    fn catalog() -> Arc<PlanCatalog> {
        Arc::new(PlanCatalog::from_config(&PlanPrices {
            pro_monthly: Some("price_pro_m".to_string()),
            pro_annual: None,
            elite_monthly: Some("price_elite_m".to_string()),
            elite_annual: None,
            gold_monthly: Some("price_gold_m".to_string()),
            gold_annual: None,
        }))
    }

    fn event(type_: &str, object: serde_json::Value) -> StripeEvent {
        StripeEvent {
            id: Some("evt_test".to_string()),
            type_: type_.to_string(),
            data: StripeEventData { object },
        }
    }

    fn subscription_object(user_id: &str, price_id: &str, status: &str) -> serde_json::Value {
        json!({
            "id": "sub_123",
            "status": status,
            "metadata": {"user_id": user_id},
            "items": {"data": [{"price": {"id": price_id}}]}
        })
    }

    fn usecase(
        billing: MockBillingGateway,
        store: MockEntitlementStore,
    ) -> EntitlementUseCase<MockBillingGateway, MockEntitlementStore> {
        EntitlementUseCase::new(Arc::new(billing), Arc::new(store), catalog())
    }

    #[tokio::test]
    async fn checkout_completed_grants_resolved_tier() {
        let mut billing = MockBillingGateway::new();
        let mut store = MockEntitlementStore::new();

        billing.expect_verify_webhook_signature().returning(|_, _| {
            Ok(event(
                "checkout.session.completed",
                json!({
                    "id": "cs_1",
                    "subscription": "sub_123",
                    "metadata": {"user_id": "user_1"}
                }),
            ))
        });
        billing
            .expect_retrieve_subscription()
            .withf(|id| id == "sub_123")
            .returning(|_| {
                Ok(serde_json::from_value(subscription_object(
                    "user_1",
                    "price_elite_m",
                    "active",
                ))
                .unwrap())
            });
        store
            .expect_set_plan()
            .withf(|user_id, tier| user_id == "user_1" && *tier == PlanTier::Elite)
            .times(1)
            .returning(|_, _| Ok(()));

        usecase(billing, store)
            .handle_billing_webhook(b"{}", "t=1,v1=ok")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn checkout_falls_back_to_client_reference_id() {
        let mut billing = MockBillingGateway::new();
        let mut store = MockEntitlementStore::new();

        billing.expect_verify_webhook_signature().returning(|_, _| {
            Ok(event(
                "checkout.session.completed",
                json!({
                    "id": "cs_1",
                    "subscription": "sub_123",
                    "client_reference_id": "user_9"
                }),
            ))
        });
        billing.expect_retrieve_subscription().returning(|_| {
            Ok(
                serde_json::from_value(subscription_object("user_9", "price_gold_m", "active"))
                    .unwrap(),
            )
        });
        store
            .expect_set_plan()
            .withf(|user_id, tier| user_id == "user_9" && *tier == PlanTier::Gold)
            .times(1)
            .returning(|_, _| Ok(()));

        usecase(billing, store)
            .handle_billing_webhook(b"{}", "t=1,v1=ok")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn checkout_without_user_id_is_a_no_op() {
        let mut billing = MockBillingGateway::new();
        let mut store = MockEntitlementStore::new();

        billing.expect_verify_webhook_signature().returning(|_, _| {
            Ok(event(
                "checkout.session.completed",
                json!({"id": "cs_1", "subscription": "sub_123"}),
            ))
        });
        billing.expect_retrieve_subscription().times(0);
        store.expect_set_plan().times(0);

        usecase(billing, store)
            .handle_billing_webhook(b"{}", "t=1,v1=ok")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn checkout_without_subscription_is_acknowledged() {
        let mut billing = MockBillingGateway::new();
        let mut store = MockEntitlementStore::new();

        // Payment-mode session: a user id but no subscription attached.
        billing.expect_verify_webhook_signature().returning(|_, _| {
            Ok(event(
                "checkout.session.completed",
                json!({"id": "cs_1", "metadata": {"user_id": "user_1"}}),
            ))
        });
        billing.expect_retrieve_subscription().times(0);
        store.expect_set_plan().times(0);

        usecase(billing, store)
            .handle_billing_webhook(b"{}", "t=1,v1=ok")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn subscription_lookup_failure_is_a_server_error() {
        let mut billing = MockBillingGateway::new();
        let mut store = MockEntitlementStore::new();

        billing.expect_verify_webhook_signature().returning(|_, _| {
            Ok(event(
                "checkout.session.completed",
                json!({
                    "id": "cs_1",
                    "subscription": "sub_123",
                    "metadata": {"user_id": "user_1"}
                }),
            ))
        });
        billing
            .expect_retrieve_subscription()
            .returning(|_| Err(anyhow!("stripe unreachable")));
        store.expect_set_plan().times(0);

        let err = usecase(billing, store)
            .handle_billing_webhook(b"{}", "t=1,v1=ok")
            .await
            .unwrap_err();
        assert_eq!(err.status_code().as_u16(), 500);
    }

    #[tokio::test]
    async fn past_due_update_does_not_write() {
        let mut billing = MockBillingGateway::new();
        let mut store = MockEntitlementStore::new();

        billing.expect_verify_webhook_signature().returning(|_, _| {
            Ok(event(
                "customer.subscription.updated",
                subscription_object("user_1", "price_elite_m", "past_due"),
            ))
        });
        store.expect_set_plan().times(0);

        usecase(billing, store)
            .handle_billing_webhook(b"{}", "t=1,v1=ok")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn active_update_is_idempotent() {
        let mut billing = MockBillingGateway::new();
        let mut store = MockEntitlementStore::new();

        billing.expect_verify_webhook_signature().returning(|_, _| {
            Ok(event(
                "customer.subscription.updated",
                subscription_object("user_1", "price_elite_m", "active"),
            ))
        });
        store
            .expect_set_plan()
            .withf(|user_id, tier| user_id == "user_1" && *tier == PlanTier::Elite)
            .times(2)
            .returning(|_, _| Ok(()));

        let usecase = usecase(billing, store);
        usecase
            .handle_billing_webhook(b"{}", "t=1,v1=ok")
            .await
            .unwrap();
        usecase
            .handle_billing_webhook(b"{}", "t=1,v1=ok")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn subscription_deleted_returns_user_to_free() {
        let mut billing = MockBillingGateway::new();
        let mut store = MockEntitlementStore::new();

        billing.expect_verify_webhook_signature().returning(|_, _| {
            Ok(event(
                "customer.subscription.deleted",
                subscription_object("user_1", "price_gold_m", "canceled"),
            ))
        });
        store
            .expect_set_plan()
            .withf(|user_id, tier| user_id == "user_1" && *tier == PlanTier::Free)
            .times(1)
            .returning(|_, _| Ok(()));

        usecase(billing, store)
            .handle_billing_webhook(b"{}", "t=1,v1=ok")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn payment_failed_keeps_entitlement() {
        let mut billing = MockBillingGateway::new();
        let mut store = MockEntitlementStore::new();

        billing.expect_verify_webhook_signature().returning(|_, _| {
            Ok(event(
                "invoice.payment_failed",
                json!({"subscription": "sub_123"}),
            ))
        });
        store.expect_set_plan().times(0);

        usecase(billing, store)
            .handle_billing_webhook(b"{}", "t=1,v1=ok")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_event_type_is_acknowledged_without_side_effects() {
        let mut billing = MockBillingGateway::new();
        let mut store = MockEntitlementStore::new();

        billing
            .expect_verify_webhook_signature()
            .returning(|_, _| Ok(event("payment_method.attached", json!({}))));
        billing.expect_retrieve_subscription().times(0);
        store.expect_set_plan().times(0);

        usecase(billing, store)
            .handle_billing_webhook(b"{}", "t=1,v1=ok")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn signature_failure_rejects_with_client_error() {
        let mut billing = MockBillingGateway::new();
        let mut store = MockEntitlementStore::new();

        billing
            .expect_verify_webhook_signature()
            .returning(|_, _| Err(anyhow!("invalid webhook signature")));
        store.expect_set_plan().times(0);

        let err = usecase(billing, store)
            .handle_billing_webhook(b"tampered", "t=1,v1=bad")
            .await
            .unwrap_err();
        assert_eq!(err.status_code().as_u16(), 400);
    }

    #[tokio::test]
    async fn entitlement_write_failure_is_swallowed() {
        let mut billing = MockBillingGateway::new();
        let mut store = MockEntitlementStore::new();

        billing.expect_verify_webhook_signature().returning(|_, _| {
            Ok(event(
                "customer.subscription.updated",
                subscription_object("user_1", "price_pro_m", "active"),
            ))
        });
        store
            .expect_set_plan()
            .times(1)
            .returning(|_, _| Err(anyhow!("metadata endpoint unreachable")));

        // The webhook is still acknowledged.
        usecase(billing, store)
            .handle_billing_webhook(b"{}", "t=1,v1=ok")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn checkout_for_free_plan_is_rejected() {
        let billing = MockBillingGateway::new();
        let store = MockEntitlementStore::new();

        let err = usecase(billing, store)
            .create_checkout("user_1", None, PlanTier::Free, BillingInterval::Monthly)
            .await
            .unwrap_err();
        assert_eq!(err.status_code().as_u16(), 400);
    }

    #[tokio::test]
    async fn checkout_uses_configured_price_id() {
        let mut billing = MockBillingGateway::new();
        let store = MockEntitlementStore::new();

        billing
            .expect_create_checkout_session()
            .withf(|price_id, user_id, email| {
                price_id == "price_elite_m" && user_id == "user_1" && email.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok("https://checkout.stripe.com/c/pay/cs_1".to_string()));

        let url = usecase(billing, store)
            .create_checkout("user_1", None, PlanTier::Elite, BillingInterval::Monthly)
            .await
            .unwrap();
        assert!(url.starts_with("https://checkout.stripe.com/"));
    }

    #[tokio::test]
    async fn checkout_without_configured_price_is_rejected() {
        let billing = MockBillingGateway::new();
        let store = MockEntitlementStore::new();

        let err = usecase(billing, store)
            .create_checkout("user_1", None, PlanTier::Elite, BillingInterval::Annual)
            .await
            .unwrap_err();
        assert_eq!(err.status_code().as_u16(), 400);
    }

    #[tokio::test]
    async fn admin_override_surfaces_write_failures() {
        let billing = MockBillingGateway::new();
        let mut store = MockEntitlementStore::new();

        store
            .expect_set_plan()
            .returning(|_, _| Err(anyhow!("metadata endpoint unreachable")));

        let err = usecase(billing, store)
            .force_set_plan("user_1", PlanTier::Gold)
            .await
            .unwrap_err();
        assert_eq!(err.status_code().as_u16(), 500);
    }

    #[test]
    fn classify_maps_unknown_types_to_unhandled() {
        let classified = classify(&event("customer.created", json!({})), &catalog());
        assert_eq!(
            classified,
            SubscriptionEvent::Unhandled {
                kind: "customer.created".to_string()
            }
        );
    }

    #[test]
    fn classify_tolerates_malformed_subscription_payloads() {
        let classified = classify(
            &event("customer.subscription.deleted", json!("not an object")),
            &catalog(),
        );
        assert_eq!(
            classified,
            SubscriptionEvent::SubscriptionDeleted { user_id: None }
        );
    }
}
