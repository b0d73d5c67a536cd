use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Entitlement level attached to a user account.
///
/// The declaration order is the entitlement order: a tier unlocks everything
/// a lower tier does. Absence of a stored plan means `Free`.
#[derive(
    Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
    Elite,
    Gold,
}

impl PlanTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Pro => "pro",
            PlanTier::Elite => "elite",
            PlanTier::Gold => "gold",
        }
    }

    /// Unknown values parse as `Free`, mirroring the absence of a stored plan.
    pub fn from_str(value: &str) -> Self {
        match value {
            "free" => PlanTier::Free,
            "pro" => PlanTier::Pro,
            "elite" => PlanTier::Elite,
            "gold" => PlanTier::Gold,
            _ => PlanTier::Free,
        }
    }

    pub fn is_paid(&self) -> bool {
        *self != PlanTier::Free
    }
}

impl Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
