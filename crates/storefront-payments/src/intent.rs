use serde::{Deserialize, Serialize};

use crate::amount::{Currency, MinorUnits};
use crate::error::PaymentError;

/// Checkout request body as posted by the storefront: `{ "amount": 500 }`.
///
/// The currency is not part of the wire format; every charge is in USD.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntentRequest {
    pub amount: MinorUnits,
    #[serde(skip)]
    pub currency: Currency,
}

impl PaymentIntentRequest {
    pub fn new(amount: MinorUnits) -> Self {
        Self {
            amount,
            currency: Currency::Usd,
        }
    }

    /// Processor parameters for this request, with automatic payment
    /// method selection turned on.
    pub fn to_params(&self) -> CreateIntentParams {
        CreateIntentParams {
            amount: self.amount,
            currency: self.currency,
            automatic_payment_methods: true,
        }
    }
}

/// Parameters sent to the processor when creating an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateIntentParams {
    pub amount: MinorUnits,
    pub currency: Currency,
    pub automatic_payment_methods: bool,
}

/// Lifecycle of a payment intent as reported by the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
}

/// The subset of the processor's payment intent object the storefront reads.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentIntent {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    pub status: PaymentIntentStatus,
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl PaymentIntent {
    /// Extract the secret the browser needs to confirm this intent.
    pub fn client_secret(&self) -> Result<ClientSecret, PaymentError> {
        match self.client_secret.as_deref() {
            Some(secret) if !secret.is_empty() => Ok(ClientSecret {
                client_secret: secret.to_string(),
            }),
            _ => Err(PaymentError::MissingClientSecret),
        }
    }
}

/// Response body returned to the storefront: `{ "clientSecret": "..." }`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSecret {
    pub client_secret: String,
}

impl std::fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecret")
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}
