use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::translate::catalog::default_models;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub translation_config: TranslationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the landing page
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_static_dir() -> String {
    "static".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_inference_service_url")]
    pub inference_service_url: String,
    /// Client-side deadline for inference service calls, unset means none
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// `source-target` -> model id
    #[serde(default = "default_models")]
    pub language_models: HashMap<String, String>,
}

fn default_inference_service_url() -> String {
    "http://localhost:8000".to_string()
}

impl TranslationConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Load a YAML or JSON configuration file, substituting `${VAR}` from the environment
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }

        let content = load_text_file(path)?;
        let content = substitute_env_vars(&content)?;

        let path_lower = path.to_lowercase();
        let config: Config = if path_lower.ends_with(".jsonld") || path_lower.ends_with(".json") {
            // @context and other unknown keys are ignored
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config {}", path))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config {}", path))?
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.system_config.port == 0 {
            anyhow::bail!("system_config.port must be non-zero");
        }
        if self.translation_config.inference_service_url.trim().is_empty() {
            anyhow::bail!("translation_config.inference_service_url must not be empty");
        }
        crate::translate::LanguageCatalog::from_keyed(&self.translation_config.language_models)?;
        Ok(())
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            inference_service_url: default_inference_service_url(),
            request_timeout_secs: None,
            language_models: default_models(),
        }
    }
}

/// Replace `${VAR_NAME}` with the variable's value, leaving unknown names as-is
fn substitute_env_vars(content: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    let replaced = pattern.replace_all(content, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    });
    Ok(replaced.into_owned())
}

/// Read a text file, dropping a UTF-8 BOM and falling back to GBK for non-UTF-8 input
fn load_text_file(path: &str) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path))?;

    let (content, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(&bytes);
    if !had_errors {
        return Ok(content.into_owned());
    }

    warn!("{} is not valid UTF-8, decoding as GBK", path);
    let (content, _, _) = encoding_rs::GBK.decode(&bytes);
    Ok(content.into_owned())
}
