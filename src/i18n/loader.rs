//! Translation loader and i18n management
//!
//! Loads per-language JSON catalogs and resolves nested keys with a
//! fallback chain to the default language.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use serde_json::{Value, Map};
use tokio::fs;
use tracing::{info, warn, error, debug};
use crate::utils::errors::{ChatWardenError, Result};
use crate::config::I18nConfig;

/// Main internationalization manager
#[derive(Debug, Clone)]
pub struct I18n {
    /// Loaded translations by language code
    translations: HashMap<String, Map<String, Value>>,
    /// Default language code
    default_language: String,
    /// Supported language codes
    supported_languages: Vec<String>,
    /// Directory holding the per-language JSON files
    locales_path: PathBuf,
}

/// Translation parameters for message formatting
pub type TranslationParams = HashMap<String, String>;

impl I18n {
    /// Create a new I18n instance
    pub fn new(config: &I18nConfig) -> Self {
        Self {
            translations: HashMap::new(),
            default_language: config.default_language.clone(),
            supported_languages: config.supported_languages.clone(),
            locales_path: PathBuf::from(&config.locales_path),
        }
    }

    /// Load all translation files from the locales directory
    pub async fn load_translations(&mut self) -> Result<()> {
        let locales_dir = self.locales_path.clone();

        let supported_languages = self.supported_languages.clone();
        for lang_code in &supported_languages {
            let file_path = locales_dir.join(format!("{}.json", lang_code));

            if file_path.exists() {
                match self.load_language_file(&file_path, lang_code).await {
                    Ok(_) => info!("Loaded translations for language: {}", lang_code),
                    Err(e) => {
                        error!("Failed to load translations for {}: {}", lang_code, e);
                        if lang_code == &self.default_language {
                            return Err(ChatWardenError::Config(
                                format!("Failed to load default language translations: {}", e)
                            ));
                        }
                    }
                }
            } else {
                warn!("Translation file not found: {}", file_path.display());
                if lang_code == &self.default_language {
                    return Err(ChatWardenError::Config(
                        format!("Default language translation file not found: {}", file_path.display())
                    ));
                }
            }
        }

        Ok(())
    }

    /// Load a single language file
    async fn load_language_file(&mut self, file_path: &Path, lang_code: &str) -> Result<()> {
        let content = fs::read_to_string(file_path).await?;
        let translations: Value = serde_json::from_str(&content)?;

        if let Value::Object(map) = translations {
            debug!("Loaded {} translation keys for {}", map.len(), lang_code);
            self.translations.insert(lang_code.to_string(), map);
        } else {
            return Err(ChatWardenError::Config(
                format!("Invalid translation file format for {}", lang_code)
            ));
        }

        Ok(())
    }

    /// Get a translated message
    pub fn t(&self, key: &str, lang: &str, params: Option<&TranslationParams>) -> String {
        let effective_lang = self.get_effective_language(lang);

        match self.get_translation_value(key, &effective_lang) {
            Some(translation) => {
                let text = extract_text_from_value(&translation);
                format_message(&text, params)
            }
            None => {
                // Fallback to default language if not found
                if effective_lang != self.default_language {
                    match self.get_translation_value(key, &self.default_language) {
                        Some(translation) => {
                            let text = extract_text_from_value(&translation);
                            format_message(&text, params)
                        }
                        None => {
                            warn!("Translation key '{}' not found in any language", key);
                            key.to_string()
                        }
                    }
                } else {
                    warn!("Translation key '{}' not found in default language", key);
                    key.to_string()
                }
            }
        }
    }

    /// Look a key up in one language, without the fallback chain.
    ///
    /// Lets tests tell a missing key apart from a key that happens to
    /// render as its own name.
    pub fn lookup(&self, key: &str, lang: &str) -> Option<String> {
        self.get_translation_value(key, lang)
            .map(|value| extract_text_from_value(&value))
    }

    /// Check if a language is supported
    pub fn is_language_supported(&self, lang: &str) -> bool {
        self.supported_languages.contains(&lang.to_string())
    }

    /// Get the effective language (fallback to default if not supported)
    fn get_effective_language(&self, lang: &str) -> String {
        if self.is_language_supported(lang) && self.translations.contains_key(lang) {
            lang.to_string()
        } else {
            self.default_language.clone()
        }
    }

    /// Get translation value from nested JSON structure
    fn get_translation_value(&self, key: &str, lang: &str) -> Option<Value> {
        let translations = self.translations.get(lang)?;

        // Support nested keys like "commands.start.welcome"
        let keys: Vec<&str> = key.split('.').collect();
        let mut current = Value::Object(translations.clone());

        for k in keys {
            current = current.get(k)?.clone();
        }

        Some(current)
    }

    /// Get supported languages
    pub fn supported_languages(&self) -> &[String] {
        &self.supported_languages
    }

    /// Get default language
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Resolve a stored (possibly absent) language to the one messages
    /// should be rendered in.
    pub fn language_or_default<'a>(&'a self, stored: Option<&'a str>) -> &'a str {
        match stored {
            Some(lang) if self.is_language_supported(lang) => lang,
            _ => &self.default_language,
        }
    }

    #[cfg(test)]
    pub(crate) fn insert_language(&mut self, lang_code: &str, map: Map<String, Value>) {
        self.translations.insert(lang_code.to_string(), map);
    }
}

/// Extract text from JSON value
fn extract_text_from_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}

/// Format message with parameters
fn format_message(template: &str, params: Option<&TranslationParams>) -> String {
    if let Some(params) = params {
        let mut result = template.to_string();
        for (key, value) in params {
            let placeholder = format!("{{{}}}", key);
            result = result.replace(&placeholder, value);
        }
        result
    } else {
        template.to_string()
    }
}
