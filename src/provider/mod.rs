//! Capabilities backed by an OpenAI-compatible chat completion endpoint.

mod client;
mod models;
mod prompt;
mod sse_parser;

use std::sync::Arc;

pub use client::ChatClient;
pub use models::{ModelDetector, ModelTranslator, parse_candidates};

use crate::capability::{Availability, DetectorFactory, Host, TranslatorFactory};

/// A host whose detector and translator both talk to one endpoint.
pub struct ProviderHost {
    client: Arc<ChatClient>,
}

impl ProviderHost {
    pub fn new(client: ChatClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Host for ProviderHost {
    fn detector(&self) -> Availability<Arc<dyn DetectorFactory>> {
        Availability::Available(Arc::new(models::ModelFactory::new(self.client.clone())))
    }

    fn translator(&self) -> Availability<Arc<dyn TranslatorFactory>> {
        Availability::Available(Arc::new(models::ModelFactory::new(self.client.clone())))
    }
}
