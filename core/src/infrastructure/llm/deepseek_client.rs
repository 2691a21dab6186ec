use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::{
    analysis::ports::LLMClient, common::entities::app_errors::CoreError,
};

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 2000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct DeepSeekClient {
    api_key: String,
    base_url: String,
    model: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

impl DeepSeekClient {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            client,
        }
    }

    fn build_request(&self, system_prompt: String, user_prompt: String) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

impl LLMClient for DeepSeekClient {
    async fn chat(&self, system_prompt: String, user_prompt: String) -> Result<String, CoreError> {
        if self.api_key.is_empty() {
            return Err(CoreError::ExternalServiceError(
                "DeepSeek API key is not configured".to_string(),
            ));
        }

        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = self.build_request(system_prompt, user_prompt);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("DeepSeek API request failed: {}", e);
                CoreError::ExternalServiceError(format!("LLM API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("DeepSeek API error: {} - {}", status, error_text);
            return Err(CoreError::ExternalServiceError(format!(
                "LLM API returned error: {} - {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse DeepSeek response: {}", e);
            CoreError::ExternalServiceError(format!("Failed to parse LLM response: {}", e))
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| CoreError::ExternalServiceError("No response from LLM".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let client = DeepSeekClient::new(
            "key".to_string(),
            "https://api.deepseek.com/".to_string(),
            "deepseek-chat".to_string(),
        );

        let request = client.build_request("system".to_string(), "user".to_string());
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(client.base_url, "https://api.deepseek.com");
        assert_eq!(value["model"], "deepseek-chat");
        assert_eq!(value["max_tokens"], 2000);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "user");
        assert!((value["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_missing_key_fails_fast() {
        let client = DeepSeekClient::new(
            String::new(),
            "http://127.0.0.1:9".to_string(),
            "deepseek-chat".to_string(),
        );

        let result = client.chat("s".to_string(), "u".to_string()).await;

        assert!(matches!(result, Err(CoreError::ExternalServiceError(_))));
    }
}
