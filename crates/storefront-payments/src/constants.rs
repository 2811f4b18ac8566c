use std::time::Duration;

/// Default processor REST endpoint.
pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Path of the payment intent collection, relative to the API base.
pub const PAYMENT_INTENTS_PATH: &str = "/v1/payment_intents";

/// Default timeout for a single outbound processor call.
pub const DEFAULT_PROCESSOR_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest charge the processor accepts, in minor units ($999,999.99).
pub const MAX_AMOUNT_MINOR_UNITS: u64 = 99_999_999;

/// Prefix every processor secret key carries.
pub const SECRET_KEY_PREFIX: &str = "sk_";
