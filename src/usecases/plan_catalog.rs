use std::collections::HashMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::config_model::PlanPrices;
use crate::domain::plan_tier::PlanTier;

/// Tier granted when a billing price identifier matches no configured tier.
/// Partial misconfiguration grants the lowest paid tier instead of failing.
pub const FALLBACK_TIER: PlanTier = PlanTier::Pro;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Monthly,
    Annual,
}

impl BillingInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingInterval::Monthly => "monthly",
            BillingInterval::Annual => "annual",
        }
    }
}

impl Display for BillingInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct PlanPricing {
    pub tier: PlanTier,
    pub name: &'static str,
    pub monthly_price_minor: i64,
    pub annual_price_minor: i64,
    pub monthly_price_id: Option<String>,
    pub annual_price_id: Option<String>,
}

/// Listing payload for the public plans route. Price identifiers stay private.
#[derive(Debug, Clone, Serialize)]
pub struct PlanDto {
    pub plan: PlanTier,
    pub name: &'static str,
    pub monthly_price_minor: i64,
    pub annual_price_minor: i64,
}

impl From<&PlanPricing> for PlanDto {
    fn from(pricing: &PlanPricing) -> Self {
        PlanDto {
            plan: pricing.tier,
            name: pricing.name,
            monthly_price_minor: pricing.monthly_price_minor,
            annual_price_minor: pricing.annual_price_minor,
        }
    }
}

/// Static, immutable price-to-tier table built once at process start.
/// Safe to share and call concurrently; lookups are pure.
pub struct PlanCatalog {
    plans: Vec<PlanPricing>,
    by_price: HashMap<String, PlanTier>,
}

impl PlanCatalog {
    pub fn from_config(prices: &PlanPrices) -> Self {
        let plans = vec![
            PlanPricing {
                tier: PlanTier::Pro,
                name: "Pro",
                monthly_price_minor: 2_900,
                annual_price_minor: 29_000,
                monthly_price_id: prices.pro_monthly.clone(),
                annual_price_id: prices.pro_annual.clone(),
            },
            PlanPricing {
                tier: PlanTier::Elite,
                name: "Elite",
                monthly_price_minor: 7_900,
                annual_price_minor: 79_000,
                monthly_price_id: prices.elite_monthly.clone(),
                annual_price_id: prices.elite_annual.clone(),
            },
            PlanPricing {
                tier: PlanTier::Gold,
                name: "Gold",
                monthly_price_minor: 14_900,
                annual_price_minor: 149_000,
                monthly_price_id: prices.gold_monthly.clone(),
                annual_price_id: prices.gold_annual.clone(),
            },
        ];

        let mut by_price = HashMap::new();
        for plan in &plans {
            for price_id in [&plan.monthly_price_id, &plan.annual_price_id]
                .into_iter()
                .flatten()
            {
                if let Some(previous) = by_price.insert(price_id.clone(), plan.tier) {
                    warn!(
                        price_id = %price_id,
                        previous_tier = %previous,
                        tier = %plan.tier,
                        "plan_catalog: price id configured for more than one tier"
                    );
                }
            }
        }

        Self { plans, by_price }
    }

    /// Maps a billing price identifier to a tier; unconfigured identifiers
    /// resolve to [`FALLBACK_TIER`].
    pub fn resolve(&self, price_id: &str) -> PlanTier {
        match self.by_price.get(price_id) {
            Some(tier) => *tier,
            None => {
                debug!(
                    price_id,
                    fallback = %FALLBACK_TIER,
                    "plan_catalog: unknown price id, using fallback tier"
                );
                FALLBACK_TIER
            }
        }
    }

    pub fn price_for(&self, tier: PlanTier, interval: BillingInterval) -> Option<&str> {
        self.plans
            .iter()
            .find(|plan| plan.tier == tier)
            .and_then(|plan| match interval {
                BillingInterval::Monthly => plan.monthly_price_id.as_deref(),
                BillingInterval::Annual => plan.annual_price_id.as_deref(),
            })
    }

    pub fn plans(&self) -> &[PlanPricing] {
        &self.plans
    }
}
