//! REST client for Stripe's payment intent API.
//!
//! Only intent creation is implemented. Confirmation happens in the browser
//! with the returned client secret, so the server never sees card data.

use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{DEFAULT_PROCESSOR_TIMEOUT, PAYMENT_INTENTS_PATH, STRIPE_API_BASE};
use crate::error::PaymentError;
use crate::intent::{CreateIntentParams, PaymentIntent};
use crate::processor::PaymentProcessor;

/// Connection settings for [`StripeClient`].
#[derive(Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl StripeConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base: STRIPE_API_BASE.to_string(),
            timeout: DEFAULT_PROCESSOR_TIMEOUT,
        }
    }
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Stripe's error envelope: `{ "error": { "type": ..., "message": ... } }`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<String>,
    message: Option<String>,
}

/// Immutable processor client, built once at startup and shared by all requests.
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: Arc<str>,
    intents_url: String,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("intents_url", &self.intents_url)
            .finish_non_exhaustive()
    }
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Result<Self, PaymentError> {
        url::Url::parse(&config.api_base)
            .map_err(|e| PaymentError::Config(format!("invalid API base {}: {e}", config.api_base)))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| PaymentError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            secret_key: Arc::from(config.secret_key),
            intents_url: format!(
                "{}{}",
                config.api_base.trim_end_matches('/'),
                PAYMENT_INTENTS_PATH
            ),
        })
    }

    pub fn intents_url(&self) -> &str {
        &self.intents_url
    }
}

impl PaymentProcessor for StripeClient {
    async fn create_payment_intent(
        &self,
        params: &CreateIntentParams,
    ) -> Result<PaymentIntent, PaymentError> {
        tracing::debug!(amount = %params.amount, currency = %params.currency, "creating payment intent");

        let resp = self
            .http
            .post(&self.intents_url)
            .bearer_auth(&*self.secret_key)
            .form(&form_fields(params))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(decode_error(status.as_u16(), &body));
        }

        let intent: PaymentIntent = serde_json::from_str(&body)
            .map_err(|e| PaymentError::Decode(format!("payment intent: {e}")))?;

        tracing::info!(intent_id = %intent.id, status = ?intent.status, "payment intent created");
        Ok(intent)
    }
}

/// Form-encoded body for `POST /v1/payment_intents`.
fn form_fields(params: &CreateIntentParams) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("amount", params.amount.get().to_string()),
        ("currency", params.currency.code().to_string()),
    ];
    if params.automatic_payment_methods {
        fields.push(("automatic_payment_methods[enabled]", "true".to_string()));
    }
    fields
}

/// Turn a non-success response into a [`PaymentError::Processor`], keeping the
/// processor's own message when the body is a recognizable error envelope.
fn decode_error(status: u16, body: &str) -> PaymentError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let ErrorBody {
                kind,
                code,
                message,
            } = envelope.error;
            tracing::warn!(
                status,
                kind = kind.as_deref().unwrap_or("unknown"),
                code = code.as_deref().unwrap_or("none"),
                "processor rejected payment intent"
            );
            PaymentError::Processor {
                status,
                message: message.unwrap_or_else(|| format!("processor returned HTTP {status}")),
            }
        }
        Err(_) => PaymentError::Processor {
            status,
            message: format!("processor returned HTTP {status}"),
        },
    }
}
