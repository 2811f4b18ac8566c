use std::time::Duration;
use url::Url;

use payments::constants::{DEFAULT_PROCESSOR_TIMEOUT, SECRET_KEY_PREFIX, STRIPE_API_BASE};
use payments::StripeConfig;

use crate::cors::AllowedOrigins;

const DEFAULT_PORT: u16 = 4242;
const DEFAULT_RATE_LIMIT_RPM: u32 = 120;

#[derive(Clone)]
pub struct ServerConfig {
    /// CORS allow-list applied to every route
    pub allowed_origins: AllowedOrigins,
    /// Storefront origin, additionally allowed on the payment routes
    pub frontend_url: Option<String>,
    /// Processor secret key (None = payment intents answer 400)
    pub stripe_secret_key: Option<String>,
    /// Processor REST base URL
    pub stripe_api_base: String,
    /// Timeout for a single processor call
    pub processor_timeout: Duration,
    /// Server port
    pub port: u16,
    /// Rate limit requests per minute, per client IP
    pub rate_limit_rpm: u32,
    /// Bearer token required for /metrics (None = forbidden unless public)
    pub metrics_token: Option<String>,
    /// Serve /metrics without a token
    pub public_metrics: bool,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("allowed_origins", &self.allowed_origins)
            .field("frontend_url", &self.frontend_url)
            .field(
                "stripe_secret_key",
                &self.stripe_secret_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("stripe_api_base", &self.stripe_api_base)
            .field("processor_timeout", &self.processor_timeout)
            .field("port", &self.port)
            .field("rate_limit_rpm", &self.rate_limit_rpm)
            .field(
                "metrics_token",
                &self.metrics_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("public_metrics", &self.public_metrics)
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        // Required: without an allow-list the CORS gate cannot be built
        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|raw| AllowedOrigins::parse(&raw))
            .filter(|origins| !origins.is_empty())
            .ok_or(ConfigError::MissingRequired("ALLOWED_ORIGINS"))?;

        let frontend_url = var("FRONTEND_URL");
        if let Some(ref frontend) = frontend_url {
            Url::parse(frontend).map_err(|_| ConfigError::InvalidUrl(frontend.clone()))?;
        }

        let stripe_secret_key = var("STRIPE_SECRET_KEY");
        match stripe_secret_key {
            Some(ref key) if !key.starts_with(SECRET_KEY_PREFIX) => {
                tracing::warn!(
                    "STRIPE_SECRET_KEY does not start with {SECRET_KEY_PREFIX:?}; \
                     the processor will likely reject it"
                );
            }
            Some(_) => {}
            None => {
                tracing::warn!("STRIPE_SECRET_KEY not set — payment intent creation is disabled");
            }
        }

        let stripe_api_base = var("STRIPE_API_BASE").unwrap_or_else(|| STRIPE_API_BASE.to_string());
        Url::parse(&stripe_api_base)
            .map_err(|_| ConfigError::InvalidUrl(stripe_api_base.clone()))?;

        let processor_timeout = match parse_positive::<u64>(&var, "PROCESSOR_TIMEOUT_SECS")? {
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_PROCESSOR_TIMEOUT,
        };

        let port = parse_number(&var, "PORT")?.unwrap_or(DEFAULT_PORT);

        // The rate limiter cannot be built with a zero quota
        let rate_limit_rpm =
            parse_positive(&var, "RATE_LIMIT_RPM")?.unwrap_or(DEFAULT_RATE_LIMIT_RPM);

        let metrics_token = var("METRICS_TOKEN");
        let public_metrics = var("STOREFRONT_PUBLIC_METRICS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            allowed_origins,
            frontend_url,
            stripe_secret_key,
            stripe_api_base,
            processor_timeout,
            port,
            rate_limit_rpm,
            metrics_token,
            public_metrics,
        })
    }

    /// Processor settings, if a secret key was configured.
    pub fn stripe_config(&self) -> Option<StripeConfig> {
        self.stripe_secret_key.as_ref().map(|key| StripeConfig {
            secret_key: key.clone(),
            api_base: self.stripe_api_base.clone(),
            timeout: self.processor_timeout,
        })
    }

    /// Allow-list for the payment routes: the shared list plus the frontend origin.
    pub fn payment_origins(&self) -> AllowedOrigins {
        match self.frontend_url {
            Some(ref frontend) => self.allowed_origins.clone().with_origin(frontend),
            None => self.allowed_origins.clone(),
        }
    }
}

fn parse_number<T: std::str::FromStr>(
    var: impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    var(name)
        .map(|raw| raw.trim().parse().map_err(|_| ConfigError::InvalidNumber(name)))
        .transpose()
}

fn parse_positive<T>(
    var: impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match parse_number::<T>(var, name)? {
        Some(value) if value <= T::default() => Err(ConfigError::InvalidNumber(name)),
        other => Ok(other),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{0} must be a positive integer")]
    InvalidNumber(&'static str),
}
