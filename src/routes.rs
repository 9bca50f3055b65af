use std::path::PathBuf;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{services::ServeFile, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;
use crate::translate::{TranslateResponse, PIVOT_LANGUAGE};

pub fn create_routes(state: &AppState) -> Router<AppState> {
    let index = PathBuf::from(&state.config.system_config.static_dir).join("index.html");

    Router::new()
        // Landing page
        .route_service("/", ServeFile::new(index))

        .route("/translate", post(translate_text).options(translate_preflight))

        .route("/api/health", get(health_check))
        .route("/api/languages", get(list_languages))
}

/// Full application: routes plus the cross-origin and tracing layers
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes(&state))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn translate_text(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            warn!("Unreadable translate body: {}", rejection.body_text());
            Value::Null
        }
    };

    let (text, source_lang, target_lang) = match (
        required_field(&payload, "text"),
        required_field(&payload, "source_lang"),
        required_field(&payload, "target_lang"),
    ) {
        (Some(text), Some(source_lang), Some(target_lang)) => (text, source_lang, target_lang),
        _ => return Err(ApiError::MissingParameters),
    };

    let translated_text = state.resolver.resolve(text, source_lang, target_lang).await?;
    Ok(Json(TranslateResponse { translated_text }))
}

/// Present, string-typed and non-empty
fn required_field<'a>(payload: &'a Value, name: &str) -> Option<&'a str> {
    payload
        .get(name)
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
}

async fn translate_preflight() -> impl IntoResponse {
    (
        [
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
        ],
        Json(json!({ "status": "Preflight successful" })),
    )
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let inference_healthy = state.resolver.provider().health_check().await;
    Json(json!({
        "status": "ok",
        "inference_service": inference_healthy,
        "started_at": state.started_at.to_rfc3339(),
    }))
}

async fn list_languages(State(state): State<AppState>) -> Json<Value> {
    let pairs: Vec<Value> = state
        .resolver
        .catalog()
        .entries()
        .into_iter()
        .map(|(pair, model_id)| {
            json!({
                "source_lang": pair.source_lang,
                "target_lang": pair.target_lang,
                "model_id": model_id,
            })
        })
        .collect();

    Json(json!({
        "pivot_language": PIVOT_LANGUAGE,
        "pairs": pairs,
    }))
}
