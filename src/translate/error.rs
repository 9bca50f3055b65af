use thiserror::Error;

/// Failure raised while resolving or running a translation.
///
/// The `Display` strings are what the HTTP layer hands back to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// Neither a direct model nor an English bridge exists for the pair
    #[error("Translation model not available.")]
    PairUnavailable {
        source_lang: String,
        target_lang: String,
    },

    /// The model provider could not materialize the model
    #[error("Error loading model: {message}")]
    ModelLoad { model_id: String, message: String },

    /// The model was loaded but inference failed
    #[error("Error during translation: {message}")]
    Generation { model_id: String, message: String },
}

impl TranslationError {
    pub fn pair_unavailable(source_lang: &str, target_lang: &str) -> Self {
        Self::PairUnavailable {
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
        }
    }

    pub fn model_load(model_id: &str, err: anyhow::Error) -> Self {
        Self::ModelLoad {
            model_id: model_id.to_string(),
            message: err.to_string(),
        }
    }

    pub fn generation(model_id: &str, err: anyhow::Error) -> Self {
        Self::Generation {
            model_id: model_id.to_string(),
            message: err.to_string(),
        }
    }

    /// The pair or model the failure concerns, for logs
    pub fn subject(&self) -> String {
        match self {
            Self::PairUnavailable { source_lang, target_lang } => {
                format!("{}-{}", source_lang, target_lang)
            }
            Self::ModelLoad { model_id, .. } | Self::Generation { model_id, .. } => model_id.clone(),
        }
    }
}
