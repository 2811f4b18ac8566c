//! Payment intents for the storefront checkout.
//!
//! The storefront never moves money itself. It asks a hosted processor to
//! create a payment intent and hands the intent's client secret back to the
//! browser, which completes the payment directly with the processor.
//!
//! # Modules
//!
//! - [`amount`] — validated minor-unit amounts and the [`Currency`] enum
//! - [`intent`] — request/response types exchanged with the processor
//! - [`processor`] — the [`PaymentProcessor`] trait the server is generic over
//! - [`stripe`] — [`StripeClient`], the REST implementation of the trait
//! - [`security`] — constant-time comparison for bearer tokens

pub mod amount;
pub mod constants;
pub mod error;
pub mod intent;
pub mod processor;
pub mod security;
pub mod stripe;

pub use amount::{Currency, MinorUnits};
pub use error::PaymentError;
pub use intent::{
    ClientSecret, CreateIntentParams, PaymentIntent, PaymentIntentRequest, PaymentIntentStatus,
};
pub use processor::PaymentProcessor;
pub use stripe::{StripeClient, StripeConfig};
