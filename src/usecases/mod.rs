pub mod access_guard;
pub mod entitlements;
pub mod plan_catalog;
