use crate::domain::plan_tier::PlanTier;

/// A billing lifecycle notification after signature verification and
/// classification of the raw provider event.
///
/// One `SubscriptionEvent` is built per inbound webhook call and discarded
/// after processing. Unknown provider event types land in `Unhandled` so they
/// are acknowledged without side effects instead of being silently coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionEvent {
    /// A hosted checkout finished; the purchased subscription must be looked
    /// up at the payment provider to learn the price and resulting tier.
    CheckoutCompleted {
        user_id: Option<String>,
        subscription_id: Option<String>,
    },
    /// The subscription changed; only applied when `status` is `"active"`.
    SubscriptionUpdated {
        user_id: Option<String>,
        tier: PlanTier,
        status: String,
    },
    /// The subscription was canceled; the user returns to `Free`.
    SubscriptionDeleted { user_id: Option<String> },
    /// A renewal charge failed. Logged only; entitlement is kept until the
    /// provider deletes the subscription (grace period policy).
    PaymentFailed { subscription_id: Option<String> },
    Unhandled { kind: String },
}
