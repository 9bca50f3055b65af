use std::collections::HashMap;
use std::fmt;

use anyhow::Result;

/// Language used as the stepping stone when no direct model exists
pub const PIVOT_LANGUAGE: &str = "en";

const DEFAULT_MODELS: &[(&str, &str)] = &[
    ("en-fr", "Helsinki-NLP/opus-mt-en-fr"),
    ("fr-en", "Helsinki-NLP/opus-mt-fr-en"),
    ("en-es", "Helsinki-NLP/opus-mt-en-es"),
    ("es-en", "Helsinki-NLP/opus-mt-es-en"),
    ("en-de", "Helsinki-NLP/opus-mt-en-de"),
    ("de-en", "Helsinki-NLP/opus-mt-de-en"),
    ("en-tl", "Helsinki-NLP/opus-mt-en-tl"),
    ("tl-en", "Helsinki-NLP/opus-mt-tl-en"),
    ("en-hi", "Helsinki-NLP/opus-mt-en-hi"),
    ("hi-en", "Helsinki-NLP/opus-mt-hi-en"),
    ("en-zh", "Helsinki-NLP/opus-mt-en-zh"),
    ("zh-en", "Helsinki-NLP/opus-mt-zh-en"),
];

/// Built-in `source-target -> model id` table
pub fn default_models() -> HashMap<String, String> {
    DEFAULT_MODELS
        .iter()
        .map(|(pair, model)| (pair.to_string(), model.to_string()))
        .collect()
}

/// Ordered (source, target) pair of language codes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguagePair {
    pub source_lang: String,
    pub target_lang: String,
}

impl LanguagePair {
    pub fn new(source_lang: &str, target_lang: &str) -> Self {
        Self {
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
        }
    }

    /// Parse a `source-target` key. Both codes must be non-empty and dash-free.
    pub fn parse(key: &str) -> Option<Self> {
        let (source, target) = key.split_once('-')?;
        if source.is_empty() || target.is_empty() || target.contains('-') {
            return None;
        }
        Some(Self::new(source, target))
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source_lang, self.target_lang)
    }
}

/// Immutable mapping from language pair to model identifier
#[derive(Debug, Clone, Default)]
pub struct LanguageCatalog {
    models: HashMap<LanguagePair, String>,
}

impl LanguageCatalog {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (LanguagePair, String)>,
    {
        Self {
            models: entries.into_iter().collect(),
        }
    }

    /// Build the catalog from `source-target` keyed configuration
    pub fn from_keyed(models: &HashMap<String, String>) -> Result<Self> {
        let mut entries = Vec::with_capacity(models.len());
        for (key, model_id) in models {
            let pair = LanguagePair::parse(key).ok_or_else(|| {
                anyhow::anyhow!("Invalid language pair '{}', expected 'source-target'", key)
            })?;
            if model_id.trim().is_empty() {
                anyhow::bail!("Empty model id for language pair '{}'", key);
            }
            entries.push((pair, model_id.clone()));
        }
        Ok(Self::from_entries(entries))
    }

    pub fn model_for(&self, source_lang: &str, target_lang: &str) -> Option<&str> {
        self.models
            .get(&LanguagePair::new(source_lang, target_lang))
            .map(String::as_str)
    }

    /// All registered pairs, sorted for stable output
    pub fn entries(&self) -> Vec<(&LanguagePair, &str)> {
        let mut entries: Vec<_> = self
            .models
            .iter()
            .map(|(pair, model)| (pair, model.as_str()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
