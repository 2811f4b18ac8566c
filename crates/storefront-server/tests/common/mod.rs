#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use tracing_subscriber::layer::SubscriberExt;

use payments::{CreateIntentParams, PaymentError, PaymentIntent, PaymentIntentStatus, PaymentProcessor};
use storefront_server::ServerConfig;

pub const SHOP_ORIGIN: &str = "https://shop.example";
pub const FRONTEND_ORIGIN: &str = "https://checkout.example";

/// What the fake processor answers with.
#[derive(Clone)]
pub enum Behavior {
    Succeed(&'static str),
    Fail(&'static str),
    NoClientSecret,
}

/// In-memory processor that records every call it receives.
#[derive(Clone)]
pub struct FakeProcessor {
    behavior: Behavior,
    calls: Arc<Mutex<Vec<CreateIntentParams>>>,
}

impl FakeProcessor {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle onto the recorded calls that survives moving the fake into app state.
    pub fn calls(&self) -> Arc<Mutex<Vec<CreateIntentParams>>> {
        Arc::clone(&self.calls)
    }
}

impl PaymentProcessor for FakeProcessor {
    async fn create_payment_intent(
        &self,
        params: &CreateIntentParams,
    ) -> Result<PaymentIntent, PaymentError> {
        self.calls.lock().unwrap().push(params.clone());

        let intent = |secret: Option<&str>| PaymentIntent {
            id: "pi_test_123".to_string(),
            amount: params.amount.get(),
            currency: params.currency.code().to_string(),
            status: PaymentIntentStatus::RequiresPaymentMethod,
            client_secret: secret.map(str::to_string),
        };

        match self.behavior {
            Behavior::Succeed(secret) => Ok(intent(Some(secret))),
            Behavior::Fail(message) => Err(PaymentError::Processor {
                status: 402,
                message: message.to_string(),
            }),
            Behavior::NoClientSecret => Ok(intent(None)),
        }
    }
}

/// Shared buffer the fmt layer writes log lines into.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Capture log output on the current thread until the guard is dropped.
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(move || writer.clone()),
    );
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}

/// Config with the shop origin allowed and the checkout frontend configured.
pub fn test_config() -> ServerConfig {
    config_from(&[
        ("ALLOWED_ORIGINS", "https://shop.example/, http://localhost:3000"),
        ("FRONTEND_URL", FRONTEND_ORIGIN),
        ("STOREFRONT_PUBLIC_METRICS", "true"),
    ])
}

pub fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ServerConfig::from_lookup(|name| map.get(name).cloned()).expect("valid test config")
}

/// Build the full application around a fake processor (or none).
macro_rules! init_app {
    ($config:expr, $processor:expr) => {{
        let config: storefront_server::ServerConfig = $config;
        let processor: Option<common::FakeProcessor> = $processor;
        let routes = config.clone();
        let state = actix_web::web::Data::new(storefront_server::AppState::new(config, processor));
        actix_web::test::init_service(actix_web::App::new().app_data(state).configure(
            move |cfg| storefront_server::configure::<common::FakeProcessor>(cfg, &routes),
        ))
        .await
    }};
}
