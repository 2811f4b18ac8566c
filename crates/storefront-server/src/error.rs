use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use payments::PaymentError;
use std::fmt;

/// Message returned when the processor secret was not configured at startup.
pub const PROCESSOR_NOT_CONFIGURED: &str = "Stripe key not configured";

#[derive(Debug)]
pub enum ApiError {
    /// Payment processor not configured
    ProcessorNotConfigured,
    /// Malformed or invalid request body
    BadRequest(String),
    /// Unknown route/method combination
    RouteNotFound,
    /// Processor call failed
    Upstream(PaymentError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ProcessorNotConfigured => write!(f, "{}", PROCESSOR_NOT_CONFIGURED),
            ApiError::BadRequest(msg) => write!(f, "invalid request: {}", msg),
            ApiError::RouteNotFound => write!(f, "route not found"),
            ApiError::Upstream(e) => write!(f, "upstream error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PaymentError> for ApiError {
    fn from(e: PaymentError) -> Self {
        match e {
            PaymentError::InvalidAmount(msg) => ApiError::BadRequest(msg),
            other => ApiError::Upstream(other),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ProcessorNotConfigured | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::ProcessorNotConfigured => {
                tracing::warn!("payment intent requested but STRIPE_SECRET_KEY is not set");
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": PROCESSOR_NOT_CONFIGURED
                }))
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "rejected payment request");
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": format!("invalid request: {}", msg)
                }))
            }
            ApiError::RouteNotFound => HttpResponse::NotFound().json(serde_json::json!({
                "message": "Route not found"
            })),
            ApiError::Upstream(e) => {
                tracing::error!(error = %e, "payment processing failed");
                // The processor's message is passed through to the caller as-is
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "message": "Internal server error",
                    "error": e.to_string()
                }))
            }
        }
    }
}
