use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// HTTP client for the model inference service that hosts the translation models
#[derive(Debug, Clone)]
pub struct InferenceServiceClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoadModelRequest {
    pub model_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoadModelResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model_id: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub translated_text: String,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl InferenceServiceClient {
    pub fn new(base_url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn load_model(&self, request: LoadModelRequest) -> Result<LoadModelResponse> {
        let url = format!("{}/translation/load", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?;
        read_json(response).await
    }

    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let url = format!("{}/translation/generate", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?;
        read_json(response).await
    }

    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}

/// Decode a service reply. Error statuses may still carry a `{success, error}`
/// body; anything else keeps the status and raw body text.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    match serde_json::from_str::<T>(&body) {
        Ok(parsed) => Ok(parsed),
        Err(e) if status.is_success() => {
            anyhow::bail!("Invalid response from inference service: {}", e)
        }
        Err(_) => anyhow::bail!("Inference service returned {}: {}", status, body.trim()),
    }
}
