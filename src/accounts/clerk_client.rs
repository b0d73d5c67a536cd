use anyhow::Result;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::plan_tier::PlanTier;

pub const DEFAULT_BASE_URL: &str = "https://api.clerk.com";

/// Client for the auth provider's backend API. The stored
/// `public_metadata.plan` field is the single source of truth for a user's
/// entitlement.
pub struct ClerkClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

/// A user as seen by this service: external id plus the stored plan tier.
/// A missing plan field means `Free`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountUser {
    pub user_id: String,
    pub email: Option<String>,
    pub plan: PlanTier,
}

#[derive(Debug, Deserialize)]
struct ClerkUser {
    id: String,
    #[serde(default)]
    email_addresses: Vec<ClerkEmail>,
    #[serde(default)]
    public_metadata: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ClerkEmail {
    email_address: String,
}

impl From<ClerkUser> for AccountUser {
    fn from(user: ClerkUser) -> Self {
        let plan = user
            .public_metadata
            .get("plan")
            .and_then(|value| value.as_str())
            .map(PlanTier::from_str)
            .unwrap_or_default();

        AccountUser {
            user_id: user.id,
            email: user
                .email_addresses
                .into_iter()
                .next()
                .map(|email| email.email_address),
            plan,
        }
    }
}

impl ClerkClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        error!(
            status = %status,
            response_body = %body,
            context = %context,
            "clerk api request failed"
        );

        anyhow::bail!("Clerk API request failed: {} (status {})", context, status);
    }

    /// Idempotent upsert of the user's plan: overwriting the same field with
    /// the same value is a no-op on the provider side.
    pub async fn set_plan(&self, user_id: &str, tier: PlanTier) -> Result<()> {
        let body = serde_json::json!({
            "public_metadata": { "plan": tier.as_str() }
        });

        let resp = self
            .http
            .patch(format!("{}/v1/users/{}/metadata", self.base_url, user_id))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;
        Self::ensure_success(resp, "patch user metadata").await?;

        Ok(())
    }

    pub async fn fetch_user(&self, user_id: &str) -> Result<AccountUser> {
        let resp = self
            .http
            .get(format!("{}/v1/users/{}", self.base_url, user_id))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "fetch user").await?;

        let user: ClerkUser = resp.json().await?;
        Ok(user.into())
    }

    pub async fn list_users(&self, limit: u32, offset: u32) -> Result<Vec<AccountUser>> {
        let resp = self
            .http
            .get(format!(
                "{}/v1/users?limit={}&offset={}",
                self.base_url, limit, offset
            ))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "list users").await?;

        let users: Vec<ClerkUser> = resp.json().await?;
        Ok(users.into_iter().map(AccountUser::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_user_with_stored_plan() {
        let raw = serde_json::json!({
            "id": "user_42",
            "email_addresses": [{"email_address": "ana@example.com"}],
            "public_metadata": {"plan": "elite"}
        });
        let user: AccountUser = serde_json::from_value::<ClerkUser>(raw).unwrap().into();
        assert_eq!(user.user_id, "user_42");
        assert_eq!(user.email.as_deref(), Some("ana@example.com"));
        assert_eq!(user.plan, PlanTier::Elite);
    }

    #[test]
    fn missing_plan_field_means_free() {
        let raw = serde_json::json!({
            "id": "user_7",
            "public_metadata": {}
        });
        let user: AccountUser = serde_json::from_value::<ClerkUser>(raw).unwrap().into();
        assert_eq!(user.plan, PlanTier::Free);
        assert_eq!(user.email, None);
    }
}
