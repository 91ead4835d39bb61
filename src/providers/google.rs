use crate::config::ProviderConfig;
use crate::providers::{LlmProvider, ProviderError};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or("GOOGLE_API_KEY not found in config or environment")?;

        Ok(GoogleProvider {
            client: Client::new(),
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string()),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "systemInstruction": {
                    "parts": [{ "text": system }]
                },
                "contents": [{
                    "parts": [{ "text": prompt }]
                }],
                "generationConfig": {
                    "temperature": self.temperature,
                    "maxOutputTokens": self.max_tokens,
                    "responseMimeType": "application/json"
                }
            }))
            .send()
            .await?;

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);

        let text = response_body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or("Failed to extract content from Google Gemini response")?
            .to_string();

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn config(base_url: Option<String>) -> ProviderConfig {
        ProviderConfig {
            enabled: true,
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.2,
            max_tokens: 2000,
            api_key: Some("test-key".to_string()),
            base_url,
        }
    }

    #[tokio::test]
    async fn test_complete() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "{}"}]}}]}"#)
            .create();

        let provider = GoogleProvider::new(&config(Some(server.url()))).unwrap();
        let text = provider.complete("system", "recipe").await.unwrap();
        assert_eq!(text, "{}");
        mock.assert();
    }

    #[test]
    fn test_provider_name() {
        let provider = GoogleProvider::new(&config(None)).unwrap();
        assert_eq!(provider.provider_name(), "google");
    }
}
