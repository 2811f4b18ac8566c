use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payments::StripeClient;
use storefront_server::{state::AppState, ServerConfig};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let port = config.port;
    let rate_limit_rpm = config.rate_limit_rpm;

    tracing::info!("Starting storefront-server on port {}", port);
    tracing::info!("Allowed origins: {:?}", config.allowed_origins.as_slice());
    if let Some(ref frontend) = config.frontend_url {
        tracing::info!("Frontend origin (payment routes): {}", frontend);
    }

    // Built once here and shared read-only by every worker
    let processor = match config.stripe_config() {
        Some(stripe_config) => match StripeClient::new(stripe_config) {
            Ok(client) => {
                tracing::info!("Payment processor: {}", client.intents_url());
                Some(client)
            }
            Err(e) => {
                tracing::error!("Failed to build payment processor client: {e}");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let route_config = config.clone();
    let state = web::Data::new(AppState::new(config, processor));

    // rate_limit_rpm is validated positive by ServerConfig
    let governor_conf = match GovernorConfigBuilder::default()
        .requests_per_minute(rate_limit_rpm as u64)
        .finish()
    {
        Some(conf) => conf,
        None => {
            tracing::error!("Invalid RATE_LIMIT_RPM: {rate_limit_rpm}");
            std::process::exit(1);
        }
    };

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(65_536))
            .wrap(Logger::default())
            .wrap(Governor::new(&governor_conf))
            .configure(|cfg| storefront_server::configure::<StripeClient>(cfg, &route_config))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
