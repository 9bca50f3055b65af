use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::TranslationConfig;
use crate::inference_service::InferenceServiceClient;
use super::catalog::LanguageCatalog;
use super::client::MarianModelProvider;
use super::interface::ModelProvider;
use super::resolver::TranslationResolver;

/// Factory for wiring the resolver to its catalog and model provider
pub struct TranslationFactory;

impl TranslationFactory {
    /// Create a resolver backed by the inference service
    ///
    /// # Arguments
    /// * `translation_config` - Catalog and provider settings
    /// * `service` - Client for the inference service
    pub fn create_resolver(
        translation_config: &TranslationConfig,
        service: Arc<InferenceServiceClient>,
    ) -> Result<Arc<TranslationResolver>> {
        info!("Initializing Marian model provider at {}", service.base_url());
        let provider: Arc<dyn ModelProvider> = Arc::new(MarianModelProvider::new(service));
        Self::create_resolver_with_provider(translation_config, provider)
    }

    /// Create a resolver around an arbitrary provider
    pub fn create_resolver_with_provider(
        translation_config: &TranslationConfig,
        provider: Arc<dyn ModelProvider>,
    ) -> Result<Arc<TranslationResolver>> {
        let catalog = LanguageCatalog::from_keyed(&translation_config.language_models)
            .context("Invalid language_models in translation_config")?;
        if catalog.is_empty() {
            warn!("Language catalog is empty, every request will be unavailable");
        } else {
            info!("Loaded language catalog with {} pairs", catalog.len());
        }

        Ok(Arc::new(TranslationResolver::new(Arc::new(catalog), provider)))
    }
}
