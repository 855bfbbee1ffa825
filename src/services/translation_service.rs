use std::{env, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::json;

const DEFAULT_TRANSLATE_URL: &str = "https://libretranslate.com/translate";

/// Target languages the translate endpoint accepts, mirroring the codes the
/// upstream service understands.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("ar", "arabic"),
    ("bn", "bengali"),
    ("de", "german"),
    ("en", "english"),
    ("es", "spanish"),
    ("fa", "persian"),
    ("fr", "french"),
    ("hi", "hindi"),
    ("id", "indonesian"),
    ("it", "italian"),
    ("ja", "japanese"),
    ("ko", "korean"),
    ("ms", "malay"),
    ("nl", "dutch"),
    ("pl", "polish"),
    ("ps", "pashto"),
    ("pt", "portuguese"),
    ("ru", "russian"),
    ("sv", "swedish"),
    ("th", "thai"),
    ("tr", "turkish"),
    ("uk", "ukrainian"),
    ("ur", "urdu"),
    ("vi", "vietnamese"),
    ("zh", "chinese"),
];

pub fn language_name(code: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

pub fn supported_codes() -> Vec<&'static str> {
    LANGUAGES.iter().map(|(code, _)| *code).collect()
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
    #[serde(rename = "detectedLanguage")]
    detected_language: Option<DetectedLanguage>,
}

#[derive(Debug, Deserialize)]
struct DetectedLanguage {
    language: String,
}

#[derive(Debug, Serialize)]
pub struct Translation {
    pub original_text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
}

pub struct TranslationService {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl TranslationService {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let base_url =
            env::var("TRANSLATE_API_URL").unwrap_or_else(|_| DEFAULT_TRANSLATE_URL.to_string());
        let api_key = env::var("TRANSLATE_API_KEY").ok();

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            api_key,
        })
    }

    /// Translates `text` into `target`, auto-detecting the source language.
    /// `target` must already be validated against [`LANGUAGES`].
    pub async fn translate(&self, text: &str, target: &str) -> Result<Translation, String> {
        let mut body = json!({
            "q": text,
            "source": "auto",
            "target": target,
            "format": "text",
        });
        if let Some(key) = &self.api_key {
            body["api_key"] = json!(key);
        }

        let response = self
            .http_client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Translation service failed. {}", e))?;

        if !response.status().is_success() {
            return Err(format!(
                "Translation service failed. Status {}",
                response.status()
            ));
        }

        let data: TranslateResponse = response
            .json()
            .await
            .map_err(|e| format!("Translation service failed. {}", e))?;

        let source_code = data
            .detected_language
            .map(|d| d.language)
            .unwrap_or_else(|| "auto".to_string());

        Ok(Translation {
            original_text: text.to_string(),
            translated_text: data.translated_text,
            source_language: language_name(&source_code)
                .map(str::to_string)
                .unwrap_or(source_code),
            target_language: language_name(target)
                .map(str::to_string)
                .unwrap_or_else(|| target.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urdu_is_a_supported_target() {
        assert_eq!(language_name("ur"), Some("urdu"));
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(language_name("xx"), None);
        assert_eq!(language_name(""), None);
    }

    #[test]
    fn supported_codes_lists_every_language() {
        let codes = supported_codes();
        assert_eq!(codes.len(), LANGUAGES.len());
        assert!(codes.contains(&"en"));
        assert!(codes.contains(&"ur"));
    }
}
