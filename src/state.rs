use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::inference_service::InferenceServiceClient;
use crate::translate::{ModelProvider, TranslationFactory, TranslationResolver};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub resolver: Arc<TranslationResolver>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let base_url = std::env::var("INFERENCE_SERVICE_URL")
            .unwrap_or_else(|_| config.translation_config.inference_service_url.clone());
        let service = Arc::new(InferenceServiceClient::new(
            base_url,
            config.translation_config.request_timeout(),
        )?);

        let resolver = TranslationFactory::create_resolver(&config.translation_config, service)?;
        Ok(Self::from_parts(config, resolver))
    }

    /// Build state around a caller-supplied model provider
    pub fn with_provider(config: Config, provider: Arc<dyn ModelProvider>) -> anyhow::Result<Self> {
        let resolver =
            TranslationFactory::create_resolver_with_provider(&config.translation_config, provider)?;
        Ok(Self::from_parts(config, resolver))
    }

    fn from_parts(config: Config, resolver: Arc<TranslationResolver>) -> Self {
        Self {
            config: Arc::new(config),
            resolver,
            started_at: Utc::now(),
        }
    }
}
