//! In-process model provider used by the unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::interface::{ModelProvider, TranslationModel};

/// One observed call, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Load(String),
    Translate { model_id: String, text: String },
}

/// Provider whose models tag their input with the model id: `[model] text`
#[derive(Default)]
pub struct RecordingProvider {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_load: Option<String>,
    fail_generate: Option<String>,
    healthy: bool,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self {
            healthy: true,
            ..Default::default()
        }
    }

    pub fn failing_load(model_id: &str) -> Self {
        Self {
            fail_load: Some(model_id.to_string()),
            ..Self::new()
        }
    }

    pub fn failing_generate(model_id: &str) -> Self {
        Self {
            fail_generate: Some(model_id.to_string()),
            ..Self::new()
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Texts passed to `translate`, in order
    pub fn translations(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Translate { model_id, text } => Some((model_id, text)),
                Call::Load(_) => None,
            })
            .collect()
    }
}

struct RecordingModel {
    model_id: String,
    calls: Arc<Mutex<Vec<Call>>>,
    fail: bool,
}

#[async_trait]
impl TranslationModel for RecordingModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn translate(&self, text: &str) -> Result<String, anyhow::Error> {
        self.calls.lock().unwrap().push(Call::Translate {
            model_id: self.model_id.clone(),
            text: text.to_string(),
        });
        if self.fail {
            anyhow::bail!("generation failed for {}", self.model_id);
        }
        Ok(format!("[{}] {}", self.model_id, text))
    }
}

#[async_trait]
impl ModelProvider for RecordingProvider {
    async fn load_model(&self, model_id: &str) -> Result<Box<dyn TranslationModel>, anyhow::Error> {
        self.calls.lock().unwrap().push(Call::Load(model_id.to_string()));
        if self.fail_load.as_deref() == Some(model_id) {
            anyhow::bail!("no such model: {}", model_id);
        }
        Ok(Box::new(RecordingModel {
            model_id: model_id.to_string(),
            calls: self.calls.clone(),
            fail: self.fail_generate.as_deref() == Some(model_id),
        }))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }
}
