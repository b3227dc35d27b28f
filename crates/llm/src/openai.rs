use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::{InferenceRequest, InferenceResponse, LlmError, LlmProvider, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Provider for OpenAI-compatible chat completion APIs
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
  client: reqwest::Client,
  api_key: String,
  base_url: String,
}

impl OpenAiProvider {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      client: reqwest::Client::new(),
      api_key: api_key.into(),
      base_url: DEFAULT_BASE_URL.to_string(),
    }
  }

  /// Point at another OpenAI-compatible server (local gateways, proxies)
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into().trim_end_matches('/').to_string();
    self
  }

  /// Set the HTTP timeout for a whole completion call
  pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
    self.client = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout_secs.max(1)))
      .build()
      .unwrap_or_default();
    self
  }

  fn endpoint(&self) -> String {
    format!("{}/v1/chat/completions", self.base_url)
  }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: Vec<ChatMessage<'a>>,
  max_tokens: u32,
  temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
  role: &'static str,
  content: MessageContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
  Text(&'a str),
  Parts(Vec<ContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
  Text { text: &'a str },
  ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
  url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  #[serde(default)]
  choices: Vec<Choice>,
  usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
  message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
  content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
  #[serde(default)]
  prompt_tokens: u32,
  #[serde(default)]
  completion_tokens: u32,
}

fn build_request(request: &InferenceRequest) -> ChatRequest<'_> {
  let mut messages = Vec::with_capacity(2);

  if let Some(system) = &request.system_prompt {
    messages.push(ChatMessage {
      role: "system",
      content: MessageContent::Text(system),
    });
  }

  let user_content = match &request.image {
    Some(image) => MessageContent::Parts(vec![
      ContentPart::Text { text: &request.prompt },
      ContentPart::ImageUrl {
        image_url: ImageUrl {
          url: format!("data:image/png;base64,{}", image),
        },
      },
    ]),
    None => MessageContent::Text(&request.prompt),
  };
  messages.push(ChatMessage {
    role: "user",
    content: user_content,
  });

  ChatRequest {
    model: &request.model,
    messages,
    max_tokens: request.max_tokens,
    temperature: request.temperature,
  }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
  fn name(&self) -> &str {
    "openai"
  }

  fn is_available(&self) -> bool {
    !self.api_key.is_empty()
  }

  async fn infer(&self, request: InferenceRequest) -> Result<InferenceResponse> {
    let start = Instant::now();
    let body = build_request(&request);

    debug!(
      model = %request.model,
      prompt_len = request.prompt.len(),
      has_image = request.image.is_some(),
      has_system_prompt = request.system_prompt.is_some(),
      "Starting chat completion request"
    );

    let response = self
      .client
      .post(self.endpoint())
      .bearer_auth(&self.api_key)
      .json(&body)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      warn!(status = status.as_u16(), "Chat completion request failed");
      return Err(LlmError::Api {
        status: status.as_u16(),
        body,
      });
    }

    let raw = response.text().await?;
    trace!(response_len = raw.len(), "Received chat completion response");
    let parsed: ChatResponse = serde_json::from_str(&raw)?;

    let text = parsed
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .filter(|t| !t.trim().is_empty())
      .ok_or(LlmError::EmptyResponse)?;

    let (input_tokens, output_tokens) = parsed
      .usage
      .map(|u| (u.prompt_tokens, u.completion_tokens))
      .unwrap_or_default();
    let duration_ms = start.elapsed().as_millis() as u64;

    debug!(
      response_len = text.len(),
      input_tokens,
      output_tokens,
      duration_ms,
      "Chat completion finished"
    );

    Ok(InferenceResponse {
      text,
      input_tokens,
      output_tokens,
      duration_ms,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_request_with_image() {
    let request = InferenceRequest {
      system_prompt: Some("be terse".to_string()),
      image: Some("QUJD".to_string()),
      ..InferenceRequest::new("build this screen", "gpt-4o")
    };

    let json = serde_json::to_value(build_request(&request)).unwrap();
    assert_eq!(json["model"], "gpt-4o");
    assert_eq!(json["messages"][0]["role"], "system");
    assert_eq!(json["messages"][0]["content"], "be terse");
    assert_eq!(json["messages"][1]["role"], "user");
    assert_eq!(json["messages"][1]["content"][0]["type"], "text");
    assert_eq!(json["messages"][1]["content"][0]["text"], "build this screen");
    assert_eq!(json["messages"][1]["content"][1]["type"], "image_url");
    assert_eq!(
      json["messages"][1]["content"][1]["image_url"]["url"],
      "data:image/png;base64,QUJD"
    );
  }

  #[test]
  fn test_request_text_only() {
    let request = InferenceRequest::new("a login page", "gpt-4o");
    let json = serde_json::to_value(build_request(&request)).unwrap();

    let messages = json["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["content"], "a login page");
  }

  #[test]
  fn test_base_url_trailing_slash() {
    let provider = OpenAiProvider::new("key").with_base_url("http://localhost:8080/");
    assert_eq!(provider.endpoint(), "http://localhost:8080/v1/chat/completions");
  }

  #[test]
  fn test_parse_response() {
    let raw = r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}],"usage":{"prompt_tokens":12,"completion_tokens":3}}"#;
    let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(parsed.choices[0].message.content.as_deref(), Some("hello"));
    assert_eq!(parsed.usage.unwrap().prompt_tokens, 12);
  }
}
