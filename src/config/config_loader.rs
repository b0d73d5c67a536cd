use anyhow::{Context, Ok, Result};

use super::config_model::{
    Accounts, AdminSecret, DotEnvyConfig, Guard, PlanPrices, Server, SessionSecret, Stripe,
};
use crate::accounts::clerk_client::DEFAULT_BASE_URL;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let stripe = Stripe {
        secret_key: std::env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY is invalid"),
        webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET")
            .expect("STRIPE_WEBHOOK_SECRET is invalid"),
        success_url: std::env::var("CHECKOUT_SUCCESS_URL").expect("CHECKOUT_SUCCESS_URL is invalid"),
        cancel_url: std::env::var("CHECKOUT_CANCEL_URL").expect("CHECKOUT_CANCEL_URL is invalid"),
    };

    let accounts = Accounts {
        api_key: std::env::var("CLERK_SECRET_KEY").expect("CLERK_SECRET_KEY is invalid"),
        base_url: std::env::var("CLERK_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
    };

    let guard = Guard {
        fallback_path: std::env::var("GUARD_FALLBACK_PATH")
            .unwrap_or_else(|_| "/pricing".to_string()),
    };

    let plans = PlanPrices {
        pro_monthly: std::env::var("STRIPE_PRICE_PRO_MONTHLY").ok(),
        pro_annual: std::env::var("STRIPE_PRICE_PRO_ANNUAL").ok(),
        elite_monthly: std::env::var("STRIPE_PRICE_ELITE_MONTHLY").ok(),
        elite_annual: std::env::var("STRIPE_PRICE_ELITE_ANNUAL").ok(),
        gold_monthly: std::env::var("STRIPE_PRICE_GOLD_MONTHLY").ok(),
        gold_annual: std::env::var("STRIPE_PRICE_GOLD_ANNUAL").ok(),
    };

    Ok(DotEnvyConfig {
        server,
        stripe,
        accounts,
        guard,
        plans,
    })
}

// Secrets read per request: a missing variable must surface as an error to
// the caller, not abort the process.
fn require_var(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{} is invalid", name))
}

pub fn get_session_secret() -> Result<SessionSecret> {
    dotenvy::dotenv().ok();

    Ok(SessionSecret {
        secret: require_var("SESSION_JWT_SECRET")?,
    })
}

pub fn get_admin_secret() -> Result<AdminSecret> {
    dotenvy::dotenv().ok();

    Ok(AdminSecret {
        api_key: require_var("ADMIN_API_KEY")?,
    })
}
