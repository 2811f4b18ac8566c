use thiserror::Error;

/// Errors returned by payment operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("http error: {0}")]
    Http(String),

    /// The processor answered with a non-success status. `message` is the
    /// processor's own explanation.
    #[error("{message}")]
    Processor { status: u16, message: String },

    #[error("unexpected processor response: {0}")]
    Decode(String),

    #[error("processor returned a payment intent without a client secret")]
    MissingClientSecret,

    #[error("config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for PaymentError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PaymentError::Http(format!("processor request timed out: {e}"))
        } else if e.is_decode() {
            PaymentError::Decode(e.to_string())
        } else {
            PaymentError::Http(e.to_string())
        }
    }
}
