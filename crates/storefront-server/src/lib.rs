//! Storefront checkout backend.
//!
//! A small actix-web service with two pieces: a [`cors::CorsGate`] that
//! enforces the origin allow-list and answers preflights, and a payment
//! dispatcher that creates payment intents through any
//! [`PaymentProcessor`](payments::PaymentProcessor).
//!
//! # Modules
//!
//! - [`config`] — environment configuration ([`ServerConfig`])
//! - [`cors`] — allow-list parsing and the CORS gate middleware
//! - [`routes`] — `/payment` dispatcher, `/health` and `/metrics`
//! - [`error`] — [`ApiError`] and its HTTP mapping
//! - [`metrics`] — Prometheus counters for payment traffic

use actix_web::web;
use payments::PaymentProcessor;

pub mod config;
pub mod cors;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use cors::{AllowedOrigins, CorsGate};
pub use error::ApiError;
pub use state::AppState;

/// Mount every route with its CORS gate.
///
/// `/payment` accepts the shared allow-list plus `FRONTEND_URL`; everything
/// else uses the shared allow-list alone.
pub fn configure<P: PaymentProcessor + 'static>(cfg: &mut web::ServiceConfig, config: &ServerConfig) {
    cfg.service(
        web::scope("/payment")
            .wrap(CorsGate::new(config.payment_origins()))
            .configure(routes::payment::configure::<P>),
    )
    .service(
        web::scope("")
            .wrap(CorsGate::new(config.allowed_origins.clone()))
            .configure(routes::health::configure::<P>),
    );
}
