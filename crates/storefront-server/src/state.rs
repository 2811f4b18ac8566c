use crate::config::ServerConfig;
use payments::PaymentProcessor;
use std::sync::Arc;

/// Shared application state
pub struct AppState<P> {
    pub config: Arc<ServerConfig>,
    /// Processor client, present only when a secret key was configured
    pub processor: Option<Arc<P>>,
}

impl<P: PaymentProcessor> AppState<P> {
    pub fn new(config: ServerConfig, processor: Option<P>) -> Self {
        Self {
            config: Arc::new(config),
            processor: processor.map(Arc::new),
        }
    }

    pub fn processor_configured(&self) -> bool {
        self.processor.is_some()
    }
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            processor: self.processor.clone(),
        }
    }
}
