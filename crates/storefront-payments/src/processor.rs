//! Seam between the HTTP layer and the hosted payment processor.
//!
//! The server is generic over [`PaymentProcessor`], so the concrete client is
//! chosen once at startup and tests can substitute an in-memory fake.

use crate::error::PaymentError;
use crate::intent::{CreateIntentParams, PaymentIntent};

/// A hosted processor capable of creating payment intents.
pub trait PaymentProcessor: Send + Sync {
    /// Create a payment intent. One attempt; callers do not retry.
    fn create_payment_intent(
        &self,
        params: &CreateIntentParams,
    ) -> impl std::future::Future<Output = Result<PaymentIntent, PaymentError>> + Send;
}
