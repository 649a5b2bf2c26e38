//! Chat-completions provider
//!
//! Minimal client for an OpenAI-compatible chat endpoint. The model is
//! resolved once from the run's tier restriction; everything else is a
//! plain JSON POST.

use crate::config::ModelTier;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Cheap, fast model used when the run is restricted to the fast tier
pub const FAST_MODEL: &str = "gpt-3.5-turbo";

/// Default reasoning model
pub const SMART_MODEL: &str = "gpt-4";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// One message in a chat exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Client for a single resolved model
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl ChatClient {
    /// Build a client for the given tier restriction.
    ///
    /// Base URL can be overridden with `OPENAI_API_BASE_URL` for
    /// compatible self-hosted endpoints.
    pub fn new(api_key: String, tier: ModelTier) -> Self {
        let model = match tier {
            ModelTier::FastOnly => FAST_MODEL,
            ModelTier::SmartOnly | ModelTier::Any => SMART_MODEL,
        };
        let base_url = std::env::var("OPENAI_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self {
            http: reqwest::Client::new(),
            base_url,
            model: model.to_string(),
            api_key,
        }
    }

    /// Model this client was resolved to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a full message list and return the assistant's reply text
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Llm(format!(
                "chat completion failed with {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Llm("chat completion returned no choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_resolves_model() {
        assert_eq!(
            ChatClient::new("k".to_string(), ModelTier::FastOnly).model(),
            FAST_MODEL
        );
        assert_eq!(
            ChatClient::new("k".to_string(), ModelTier::SmartOnly).model(),
            SMART_MODEL
        );
        assert_eq!(
            ChatClient::new("k".to_string(), ModelTier::Any).model(),
            SMART_MODEL
        );
    }

    #[test]
    fn test_chat_message_roles() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
        assert_eq!(ChatMessage::assistant("a").role, "assistant");
    }
}
