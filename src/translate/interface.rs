use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Successful translation as returned over HTTP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
}

/// A materialized translation model for one language pair
#[async_trait]
pub trait TranslationModel: Send + Sync {
    /// Identifier the model was loaded from
    fn model_id(&self) -> &str;

    /// Translate a single piece of text
    ///
    /// # Arguments
    /// * `text` - Source text, passed through untouched
    ///
    /// # Returns
    /// The decoded output of the model
    async fn translate(&self, text: &str) -> Result<String, anyhow::Error>;
}

/// Source of translation models - actual inference happens outside this process
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Materialize the model registered under `model_id`
    async fn load_model(&self, model_id: &str) -> Result<Box<dyn TranslationModel>, anyhow::Error>;

    /// Whether the backing service is reachable
    async fn health_check(&self) -> bool {
        true
    }
}
