use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, instrument};
use voyage_core::AgentResult;

use crate::roles::AgentRole;
use crate::{AgentError, ReasoningAgent};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
        }
    }

    fn responses_url(&self) -> String {
        format!("{}/v1/responses", self.base_url.trim_end_matches('/'))
    }
}

/// One role bound to the OpenAI Responses API.
#[derive(Clone)]
pub struct OpenAiAgent {
    client: Client,
    config: Arc<OpenAiConfig>,
    role: AgentRole,
}

impl OpenAiAgent {
    pub fn new(client: Client, config: Arc<OpenAiConfig>, role: AgentRole) -> Self {
        Self {
            client,
            config,
            role,
        }
    }

    fn payload(&self, prompt: &str) -> Value {
        let mut payload = json!({
            "model": self.config.model,
            "input": [
                {
                    "role": "system",
                    "content": [
                        { "type": "input_text", "text": self.role.system_prompt() }
                    ]
                },
                {
                    "role": "user",
                    "content": [
                        { "type": "input_text", "text": prompt }
                    ]
                }
            ]
        });

        let tools = self.role.tools();
        if !tools.is_empty() {
            payload["tools"] = Value::Array(tools);
        }
        payload
    }
}

impl ReasoningAgent for OpenAiAgent {
    fn name(&self) -> &str {
        self.role.name()
    }

    #[instrument(skip(self, prompt), fields(agent = self.role.name(), prompt_len = prompt.len()))]
    async fn run(&self, prompt: &str) -> Result<AgentResult, AgentError> {
        let response = self
            .client
            .post(self.config.responses_url())
            .bearer_auth(self.config.api_key.as_str())
            .json(&self.payload(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        let content = extract_output_text(&body)
            .filter(|value| !value.trim().is_empty())
            .ok_or(AgentError::EmptyOutput)?;

        debug!(content_len = content.len(), "agent responded");
        Ok(AgentResult::new(content))
    }
}

pub fn extract_output_text(payload: &Value) -> Option<String> {
    if let Some(value) = payload.get("output_text").and_then(|value| value.as_str()) {
        return Some(value.to_string());
    }
    let output = payload.get("output")?.as_array()?;
    let mut chunks = Vec::new();
    for item in output {
        if let Some(content) = item.get("content").and_then(|value| value.as_array()) {
            for content_item in content {
                if content_item
                    .get("type")
                    .and_then(|value| value.as_str())
                    .map(|value| value == "output_text")
                    .unwrap_or(false)
                {
                    if let Some(text) = content_item.get("text").and_then(|value| value.as_str()) {
                        chunks.push(text.to_string());
                    }
                }
            }
        }
    }
    if chunks.is_empty() {
        None
    } else {
        Some(chunks.join("\n\n"))
    }
}
