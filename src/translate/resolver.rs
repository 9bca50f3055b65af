use std::sync::Arc;

use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use super::catalog::{LanguageCatalog, PIVOT_LANGUAGE};
use super::error::TranslationError;
use super::interface::ModelProvider;

/// How a language pair gets translated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// A single model covers the pair
    Direct { model_id: &'a str },
    /// `source -> en` followed by `en -> target`
    Pivot { first: &'a str, second: &'a str },
}

impl Route<'_> {
    pub fn hops(&self) -> usize {
        match self {
            Route::Direct { .. } => 1,
            Route::Pivot { .. } => 2,
        }
    }
}

/// Picks a route through the catalog and runs it against the model provider.
///
/// Holds no mutable state; share it behind an `Arc`.
pub struct TranslationResolver {
    catalog: Arc<LanguageCatalog>,
    provider: Arc<dyn ModelProvider>,
}

impl TranslationResolver {
    pub fn new(catalog: Arc<LanguageCatalog>, provider: Arc<dyn ModelProvider>) -> Self {
        Self { catalog, provider }
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    pub fn provider(&self) -> &Arc<dyn ModelProvider> {
        &self.provider
    }

    /// Find a route for the pair without touching any model.
    ///
    /// A direct entry wins. Otherwise both `source-en` and `en-target` must be
    /// cataloged; only one intermediate hop is ever considered.
    pub fn plan(&self, source_lang: &str, target_lang: &str) -> Option<Route<'_>> {
        if let Some(model_id) = self.catalog.model_for(source_lang, target_lang) {
            return Some(Route::Direct { model_id });
        }

        let first = self.catalog.model_for(source_lang, PIVOT_LANGUAGE)?;
        let second = self.catalog.model_for(PIVOT_LANGUAGE, target_lang)?;
        Some(Route::Pivot { first, second })
    }

    /// Translate `text` from `source_lang` into `target_lang`
    pub async fn resolve(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslationError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("translate", %request_id, source_lang, target_lang);

        async move {
            let route = match self.plan(source_lang, target_lang) {
                Some(route) => route,
                None => {
                    warn!("No direct or pivot model for {}-{}", source_lang, target_lang);
                    return Err(TranslationError::pair_unavailable(source_lang, target_lang));
                }
            };
            info!("Translating via {} hop(s): {:?}", route.hops(), route);

            match route {
                Route::Direct { model_id } => self.run_model(model_id, text).await,
                Route::Pivot { first, second } => {
                    let intermediate = self.run_model(first, text).await?;
                    debug!("Pivot text: {}", intermediate);
                    self.run_model(second, &intermediate).await
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run_model(&self, model_id: &str, text: &str) -> Result<String, TranslationError> {
        let model = self.provider.load_model(model_id).await.map_err(|e| {
            warn!("Failed to load model {}: {}", model_id, e);
            TranslationError::model_load(model_id, e)
        })?;

        let output = model.translate(text).await.map_err(|e| {
            warn!("Model {} failed during generation: {}", model.model_id(), e);
            TranslationError::generation(model_id, e)
        })?;

        debug!("Model {} produced {} chars", model_id, output.chars().count());
        Ok(output)
    }
}
