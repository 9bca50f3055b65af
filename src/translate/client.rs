use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::inference_service::{GenerateRequest, InferenceServiceClient, LoadModelRequest};
use super::interface::{ModelProvider, TranslationModel};

/// Model provider backed by the inference service.
///
/// Every `load_model` call goes to the service; nothing is cached here.
pub struct MarianModelProvider {
    service: Arc<InferenceServiceClient>,
}

impl MarianModelProvider {
    pub fn new(service: Arc<InferenceServiceClient>) -> Self {
        Self { service }
    }
}

/// Handle to a model the inference service has loaded
pub struct RemoteModel {
    model_id: String,
    service: Arc<InferenceServiceClient>,
}

#[async_trait]
impl ModelProvider for MarianModelProvider {
    async fn load_model(&self, model_id: &str) -> Result<Box<dyn TranslationModel>, anyhow::Error> {
        debug!("Loading translation model: {}", model_id);

        let response = self
            .service
            .load_model(LoadModelRequest {
                model_id: model_id.to_string(),
            })
            .await?;

        if !response.success {
            let error_msg = response.error.unwrap_or_else(|| "Unknown error".to_string());
            error!("Model load failed for {}: {}", model_id, error_msg);
            anyhow::bail!(error_msg);
        }

        Ok(Box::new(RemoteModel {
            model_id: model_id.to_string(),
            service: self.service.clone(),
        }))
    }

    async fn health_check(&self) -> bool {
        self.service.health_check().await.unwrap_or(false)
    }
}

#[async_trait]
impl TranslationModel for RemoteModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn translate(&self, text: &str) -> Result<String, anyhow::Error> {
        let response = self
            .service
            .generate(GenerateRequest {
                model_id: self.model_id.clone(),
                text: text.to_string(),
            })
            .await?;

        if response.success {
            debug!("Generation with {} successful", self.model_id);
            Ok(response.translated_text)
        } else {
            let error_msg = response.error.unwrap_or_else(|| "Unknown error".to_string());
            error!("Generation failed for {}: {}", self.model_id, error_msg);
            Err(anyhow::anyhow!(error_msg))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::{
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::translate::catalog::{LanguageCatalog, LanguagePair};
    use crate::translate::{TranslationError, TranslationResolver};

    type Received = Arc<Mutex<Vec<Value>>>;

    async fn stub_load(State(received): State<Received>, Json(body): Json<Value>) -> Response {
        received.lock().unwrap().push(body.clone());
        match body["model_id"].as_str() {
            Some("missing") => Json(json!({ "success": false, "error": "model not found" })).into_response(),
            Some("crash") => (StatusCode::INTERNAL_SERVER_ERROR, "CUDA out of memory").into_response(),
            _ => Json(json!({ "success": true, "error": null })).into_response(),
        }
    }

    async fn stub_generate(State(received): State<Received>, Json(body): Json<Value>) -> Response {
        received.lock().unwrap().push(body.clone());
        let model_id = body["model_id"].as_str().unwrap_or_default();
        let text = body["text"].as_str().unwrap_or_default();
        if model_id == "overloaded" {
            return (StatusCode::SERVICE_UNAVAILABLE, "queue full").into_response();
        }
        if text == "boom" {
            return Json(json!({ "success": false, "error": "decoder diverged" })).into_response();
        }
        Json(json!({
            "translated_text": format!("<{}> {}", model_id, text),
            "success": true,
        }))
        .into_response()
    }

    /// Inference service double listening on an ephemeral port
    async fn spawn_service() -> (String, Received) {
        let received: Received = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/translation/load", post(stub_load))
            .route("/translation/generate", post(stub_generate))
            .route("/health", get(|| async { StatusCode::OK }))
            .with_state(received.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), received)
    }

    /// Address nothing is listening on
    async fn closed_addr() -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr
    }

    fn service(base_url: String) -> Arc<InferenceServiceClient> {
        Arc::new(InferenceServiceClient::new(base_url, Some(Duration::from_secs(5))).unwrap())
    }

    fn resolver_for(base_url: String) -> TranslationResolver {
        let catalog = LanguageCatalog::from_entries(vec![
            (LanguagePair::new("en", "fr"), "opus-en-fr".to_string()),
            (LanguagePair::new("fr", "en"), "opus-fr-en".to_string()),
            (LanguagePair::new("en", "es"), "opus-en-es".to_string()),
            (LanguagePair::new("en", "de"), "missing".to_string()),
            (LanguagePair::new("en", "zh"), "crash".to_string()),
            (LanguagePair::new("en", "tl"), "overloaded".to_string()),
        ]);
        let provider = Arc::new(MarianModelProvider::new(service(base_url)));
        TranslationResolver::new(Arc::new(catalog), provider)
    }

    #[tokio::test]
    async fn sends_load_then_generate_bodies() {
        let (base_url, received) = spawn_service().await;
        let resolver = resolver_for(base_url);

        let out = resolver.resolve("hello", "en", "fr").await.unwrap();

        assert_eq!(out, "<opus-en-fr> hello");
        assert_eq!(
            *received.lock().unwrap(),
            vec![
                json!({ "model_id": "opus-en-fr" }),
                json!({ "model_id": "opus-en-fr", "text": "hello" }),
            ]
        );
    }

    #[tokio::test]
    async fn pivots_through_the_service() {
        let (base_url, _received) = spawn_service().await;
        let resolver = resolver_for(base_url);

        let out = resolver.resolve("bonjour", "fr", "es").await.unwrap();

        assert_eq!(out, "<opus-en-es> <opus-fr-en> bonjour");
    }

    #[tokio::test]
    async fn unsuccessful_load_becomes_model_load_error() {
        let (base_url, received) = spawn_service().await;
        let resolver = resolver_for(base_url);

        let err = resolver.resolve("hello", "en", "de").await.unwrap_err();

        assert_eq!(
            err,
            TranslationError::ModelLoad {
                model_id: "missing".to_string(),
                message: "model not found".to_string(),
            }
        );
        assert_eq!(err.to_string(), "Error loading model: model not found");
        // generate is never reached
        assert_eq!(received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unsuccessful_generation_becomes_generation_error() {
        let (base_url, _received) = spawn_service().await;
        let resolver = resolver_for(base_url);

        let err = resolver.resolve("boom", "en", "fr").await.unwrap_err();

        assert_eq!(
            err,
            TranslationError::Generation {
                model_id: "opus-en-fr".to_string(),
                message: "decoder diverged".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn plain_text_error_status_keeps_service_message() {
        let (base_url, _received) = spawn_service().await;
        let resolver = resolver_for(base_url);

        let err = resolver.resolve("hello", "en", "zh").await.unwrap_err();
        match err {
            TranslationError::ModelLoad { ref message, .. } => {
                assert!(message.contains("500"), "{}", message);
                assert!(message.contains("CUDA out of memory"), "{}", message);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = resolver.resolve("hello", "en", "tl").await.unwrap_err();
        match err {
            TranslationError::Generation { ref message, .. } => {
                assert!(message.contains("503"), "{}", message);
                assert!(message.contains("queue full"), "{}", message);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_service_fails_load() {
        let addr = closed_addr().await;
        let resolver = resolver_for(format!("http://{}", addr));

        let err = resolver.resolve("hello", "en", "fr").await.unwrap_err();

        assert!(matches!(
            err,
            TranslationError::ModelLoad { ref model_id, .. } if model_id == "opus-en-fr"
        ));
    }

    #[tokio::test]
    async fn unreachable_service_fails_generation() {
        let addr = closed_addr().await;
        let model = RemoteModel {
            model_id: "opus-en-fr".to_string(),
            service: service(format!("http://{}", addr)),
        };

        assert!(model.translate("hello").await.is_err());
    }

    #[tokio::test]
    async fn health_follows_service_reachability() {
        let (base_url, _received) = spawn_service().await;
        assert!(MarianModelProvider::new(service(base_url)).health_check().await);

        let addr = closed_addr().await;
        assert!(!MarianModelProvider::new(service(format!("http://{}", addr))).health_check().await);
    }
}
