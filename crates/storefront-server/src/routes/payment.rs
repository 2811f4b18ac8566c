use actix_web::http::Method;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use serde::Deserialize;
use std::str::FromStr;
use std::time::Instant;

use payments::{PaymentIntentRequest, PaymentProcessor};

use crate::error::ApiError;
use crate::metrics::{PAYMENT_INTENTS, PAYMENT_REQUESTS, PROCESSOR_LATENCY};
use crate::state::AppState;

/// Actions selectable through `?route=` on the payment endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentAction {
    CreatePaymentIntent,
}

impl PaymentAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentAction::CreatePaymentIntent => "create-payment-intent",
        }
    }

    /// The only method each action answers to.
    pub fn method(&self) -> Method {
        match self {
            PaymentAction::CreatePaymentIntent => Method::POST,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for PaymentAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create-payment-intent" => Ok(PaymentAction::CreatePaymentIntent),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PaymentQuery {
    pub route: Option<String>,
}

/// Parse the action selector. Malformed query strings select nothing.
fn parse_action(query: &str) -> Option<PaymentAction> {
    let query = web::Query::<PaymentQuery>::from_query(query)
        .map(web::Query::into_inner)
        .unwrap_or_default();
    let route = query.route?;
    match route.parse() {
        Ok(action) => Some(action),
        Err(e) => {
            tracing::debug!(error = %e, "unrecognized payment route");
            None
        }
    }
}

/// ANY /payment?route=... - Payment action dispatcher
pub async fn dispatch<P: PaymentProcessor + 'static>(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState<P>>,
) -> Result<HttpResponse, ApiError> {
    if req.method() == Method::OPTIONS {
        return Ok(HttpResponse::Ok().finish());
    }

    let action = parse_action(req.query_string());

    let result = match action {
        Some(action) if *req.method() == action.method() => match action {
            PaymentAction::CreatePaymentIntent => create_payment_intent(&state, &body).await,
        },
        _ => Err(ApiError::RouteNotFound),
    };

    let status = match result {
        Ok(ref resp) => resp.status(),
        Err(ref e) => e.status_code(),
    };
    let label = action.map(|a| a.as_str()).unwrap_or("unknown");
    PAYMENT_REQUESTS
        .with_label_values(&[label, status.as_str()])
        .inc();

    result
}

async fn create_payment_intent<P: PaymentProcessor>(
    state: &AppState<P>,
    body: &[u8],
) -> Result<HttpResponse, ApiError> {
    // Checked before the body so an unconfigured server never parses or forwards anything
    let processor = state
        .processor
        .as_ref()
        .ok_or(ApiError::ProcessorNotConfigured)?;

    let request: PaymentIntentRequest =
        serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let params = request.to_params();

    let start = Instant::now();
    let outcome = match processor.create_payment_intent(&params).await {
        Ok(intent) => intent.client_secret().map(|secret| (intent, secret)),
        Err(e) => Err(e),
    };
    let elapsed = start.elapsed().as_secs_f64();

    match outcome {
        Ok((intent, secret)) => {
            PAYMENT_INTENTS.with_label_values(&["success"]).inc();
            PROCESSOR_LATENCY
                .with_label_values(&["success"])
                .observe(elapsed);
            tracing::info!(
                intent_id = %intent.id,
                amount = %params.amount,
                currency = %params.currency,
                "payment intent ready for client confirmation"
            );
            Ok(HttpResponse::Ok().json(secret))
        }
        Err(e) => {
            PAYMENT_INTENTS.with_label_values(&["error"]).inc();
            PROCESSOR_LATENCY
                .with_label_values(&["error"])
                .observe(elapsed);
            Err(e.into())
        }
    }
}

pub fn configure<P: PaymentProcessor + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::route().to(dispatch::<P>)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_action() {
        assert_eq!(
            parse_action("route=create-payment-intent"),
            Some(PaymentAction::CreatePaymentIntent)
        );
    }

    #[test]
    fn unknown_or_missing_action_selects_nothing() {
        assert_eq!(parse_action("route=refund"), None);
        assert_eq!(parse_action(""), None);
        assert_eq!(parse_action("other=1"), None);
        assert_eq!(parse_action("route=%zz"), None);
    }

    #[test]
    fn action_round_trips_through_its_name() {
        let action = PaymentAction::CreatePaymentIntent;
        assert_eq!(action.as_str().parse::<PaymentAction>(), Ok(action));
        assert_eq!(action.method(), Method::POST);
    }
}
