use std::collections::HashMap;

use anyhow::Result;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::error;

type HmacSha256 = Hmac<Sha256>;

/// Minimal Stripe client built on reqwest. Constructed once at startup and
/// injected into the webhook/checkout use cases.
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    webhook_secret: String,
    success_url: String,
    cancel_url: String,
}

#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub type_: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct StripeCheckoutSession {
    pub id: Option<String>,
    pub subscription: Option<String>,
    pub customer: Option<String>,
    pub client_reference_id: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
}

/// Subscription object as it appears both in `customer.subscription.*` event
/// payloads and in retrieve responses.
#[derive(Debug, Deserialize)]
pub struct StripeSubscriptionObject {
    pub id: Option<String>,
    pub status: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
    #[serde(default)]
    pub items: StripeSubscriptionItems,
}

#[derive(Debug, Deserialize, Default)]
pub struct StripeSubscriptionItems {
    pub data: Vec<StripeSubscriptionItem>,
}

#[derive(Debug, Deserialize)]
pub struct StripeSubscriptionItem {
    pub price: Option<StripePrice>,
}

#[derive(Debug, Deserialize)]
pub struct StripePrice {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorDetails,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetails {
    #[serde(rename = "type")]
    type_: Option<String>,
    code: Option<String>,
    message: Option<String>,
}

impl StripeSubscriptionObject {
    /// Price identifier of the first subscription item.
    pub fn price_id(&self) -> Option<&str> {
        self.items
            .data
            .first()
            .and_then(|item| item.price.as_ref())
            .and_then(|price| price.id.as_deref())
    }

    /// External user id carried in the subscription metadata, set at checkout
    /// session creation via `subscription_data[metadata]`.
    pub fn user_id(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.get("user_id"))
            .map(String::as_str)
    }
}

impl StripeClient {
    pub fn new(
        secret_key: String,
        webhook_secret: String,
        success_url: String,
        cancel_url: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            webhook_secret,
            success_url,
            cancel_url,
        }
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let request_id = resp
            .headers()
            .get("request-id")
            .or_else(|| resp.headers().get("stripe-request-id"))
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let (stripe_error_type, stripe_error_code, stripe_error_message) =
            match serde_json::from_str::<StripeErrorEnvelope>(&body) {
                Ok(envelope) => {
                    let details = envelope.error;
                    (details.type_, details.code, details.message)
                }
                Err(_) => (None, None, None),
            };

        error!(
            status = %status,
            stripe_request_id = ?request_id,
            stripe_error_type = ?stripe_error_type,
            stripe_error_code = ?stripe_error_code,
            stripe_error_message = ?stripe_error_message,
            context = %context,
            "stripe api request failed"
        );

        anyhow::bail!(
            "Stripe API request failed: {} (status {}, request_id={:?})",
            context,
            status,
            request_id
        );
    }

    /// Creates a subscription-mode Checkout Session and returns its URL.
    ///
    /// The external user id is attached three ways so the webhook path can
    /// recover it from either the session or the subscription object:
    /// `client_reference_id`, session metadata, and subscription metadata.
    pub async fn create_checkout_session(
        &self,
        price_id: &str,
        user_id: &str,
        customer_email: Option<String>,
    ) -> Result<String> {
        // Stripe Checkout docs:
        // https://stripe.com/docs/payments/checkout
        let mut body: Vec<(String, String)> = vec![
            ("mode".to_string(), "subscription".to_string()),
            ("line_items[0][price]".to_string(), price_id.to_string()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            ("success_url".to_string(), self.success_url.clone()),
            ("cancel_url".to_string(), self.cancel_url.clone()),
            ("client_reference_id".to_string(), user_id.to_string()),
            ("metadata[user_id]".to_string(), user_id.to_string()),
            (
                "subscription_data[metadata][user_id]".to_string(),
                user_id.to_string(),
            ),
        ];

        if let Some(email) = customer_email {
            body.push(("customer_email".to_string(), email));
        }

        let resp = self
            .http
            .post("https://api.stripe.com/v1/checkout/sessions")
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "create checkout session").await?;

        #[derive(Deserialize)]
        struct CheckoutResp {
            url: Option<String>,
        }

        let parsed: CheckoutResp = resp.json().await?;
        parsed
            .url
            .ok_or_else(|| anyhow::anyhow!("Stripe Checkout session URL is missing"))
    }

    /// Verifies the webhook signature over the raw request bytes.
    /// https://stripe.com/docs/webhooks/signatures
    pub fn verify_webhook_signature(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<StripeEvent> {
        let mut timestamp: Option<String> = None;
        let mut signature: Option<String> = None;

        for part in signature_header.split(',') {
            if let Some(rest) = part.strip_prefix("t=") {
                timestamp = Some(rest.to_string());
            } else if let Some(rest) = part.strip_prefix("v1=") {
                signature = Some(rest.to_string());
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| anyhow::anyhow!("missing timestamp in stripe-signature"))?;
        let signature =
            signature.ok_or_else(|| anyhow::anyhow!("missing v1 in stripe-signature"))?;

        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())?;
        mac.update(signed_payload.as_bytes());
        let expected = mac.finalize().into_bytes();
        let provided = hex::decode(signature)?;

        if !bool::from(expected.as_slice().ct_eq(provided.as_slice())) {
            anyhow::bail!("invalid webhook signature");
        }

        let event: StripeEvent = serde_json::from_slice(payload)?;
        Ok(event)
    }

    pub fn extract_checkout_session(event: &StripeEvent) -> Option<StripeCheckoutSession> {
        serde_json::from_value(event.data.object.clone()).ok()
    }

    pub fn extract_subscription(event: &StripeEvent) -> Option<StripeSubscriptionObject> {
        serde_json::from_value(event.data.object.clone()).ok()
    }

    pub async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<StripeSubscriptionObject> {
        // https://stripe.com/docs/api/subscriptions/retrieve
        let resp = self
            .http
            .get(format!(
                "https://api.stripe.com/v1/subscriptions/{}",
                subscription_id
            ))
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .send()
            .await?;
        let resp = Self::ensure_success(resp, "retrieve subscription").await?;

        let subscription: StripeSubscriptionObject = resp.json().await?;
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_secret(secret: &str) -> StripeClient {
        StripeClient::new(
            "sk_test_dummy".to_string(),
            secret.to_string(),
            "https://app.example.com/billing/success".to_string(),
            "https://app.example.com/billing/cancel".to_string(),
        )
    }

    fn sign(secret: &str, timestamp: &str, payload: &[u8]) -> String {
        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(signed_payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn accepts_valid_signature_over_raw_bytes() {
        let secret = "whsec_unit_test";
        // Field order is deliberately unusual: the signature covers raw bytes,
        // not re-serialized JSON.
        let payload = br#"{"data":{"object":{}},"type":"invoice.payment_failed","id":"evt_1"}"#;
        let timestamp = "1714556800";
        let header = format!("t={},v1={}", timestamp, sign(secret, timestamp, payload));

        let event = client_with_secret(secret)
            .verify_webhook_signature(payload, &header)
            .expect("valid signature should verify");
        assert_eq!(event.type_, "invoice.payment_failed");
    }

    #[test]
    fn rejects_tampered_body() {
        let secret = "whsec_unit_test";
        let payload = br#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{}}}"#;
        let timestamp = "1714556800";
        let header = format!("t={},v1={}", timestamp, sign(secret, timestamp, payload));

        let tampered = br#"{"id":"evt_2","type":"checkout.session.completed","data":{"object":{}}}"#;
        let result = client_with_secret(secret).verify_webhook_signature(tampered, &header);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_header_without_signature_parts() {
        let result =
            client_with_secret("whsec_unit_test").verify_webhook_signature(b"{}", "v0=deadbeef");
        assert!(result.is_err());
    }

    #[test]
    fn subscription_object_exposes_price_and_user() {
        let raw = serde_json::json!({
            "id": "sub_123",
            "status": "active",
            "metadata": {"user_id": "user_42"},
            "items": {"data": [{"price": {"id": "price_elite_monthly"}}]}
        });
        let subscription: StripeSubscriptionObject = serde_json::from_value(raw).unwrap();
        assert_eq!(subscription.price_id(), Some("price_elite_monthly"));
        assert_eq!(subscription.user_id(), Some("user_42"));
    }
}
