pub mod plan_tier;
pub mod subscription_event;
