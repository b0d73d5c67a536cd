#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub stripe: Stripe,
    pub accounts: Accounts,
    pub guard: Guard,
    pub plans: PlanPrices,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Stripe {
    pub secret_key: String,
    pub webhook_secret: String,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone)]
pub struct Accounts {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct Guard {
    pub fallback_path: String,
}

/// Billing price identifiers per paid tier. Unset identifiers are tolerated
/// and simply never match during webhook resolution.
#[derive(Debug, Clone, Default)]
pub struct PlanPrices {
    pub pro_monthly: Option<String>,
    pub pro_annual: Option<String>,
    pub elite_monthly: Option<String>,
    pub elite_annual: Option<String>,
    pub gold_monthly: Option<String>,
    pub gold_annual: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SessionSecret {
    pub secret: String,
}

#[derive(Debug, Clone)]
pub struct AdminSecret {
    pub api_key: String,
}
