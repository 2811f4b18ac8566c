use actix_web::{web, HttpRequest, HttpResponse};
use payments::security::constant_time_eq;
use payments::PaymentProcessor;

use crate::metrics::metrics_output;
use crate::state::AppState;

/// GET /health - Liveness plus processor configuration status
pub async fn health<P: PaymentProcessor + 'static>(
    state: web::Data<AppState<P>>,
) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "storefront-server",
        "version": env!("CARGO_PKG_VERSION"),
        "processor": if state.processor_configured() { "configured" } else { "not_configured" },
    }))
}

/// GET /metrics - Prometheus metrics endpoint (token-gated unless public)
pub async fn metrics<P: PaymentProcessor + 'static>(
    req: HttpRequest,
    state: web::Data<AppState<P>>,
) -> HttpResponse {
    match state.config.metrics_token {
        Some(ref expected) => {
            let authorized = req
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(|token| constant_time_eq(token.as_bytes(), expected.as_bytes()))
                .unwrap_or(false);

            if !authorized {
                return HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "unauthorized",
                    "message": "Valid Bearer token required for /metrics"
                }));
            }
        }
        None if !state.config.public_metrics => {
            return HttpResponse::Forbidden().json(serde_json::json!({
                "error": "forbidden",
                "message": "Set METRICS_TOKEN or STOREFRONT_PUBLIC_METRICS=true to access /metrics"
            }));
        }
        None => {}
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics_output())
}

pub fn configure<P: PaymentProcessor + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::<P>))
        .route("/metrics", web::get().to(metrics::<P>));
}
