use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::{InferenceRequest, InferenceResponse, LlmError, LlmProvider, Result};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Provider for the Anthropic Messages API
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
  client: reqwest::Client,
  api_key: String,
  base_url: String,
}

impl AnthropicProvider {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      client: reqwest::Client::new(),
      api_key: api_key.into(),
      base_url: DEFAULT_BASE_URL.to_string(),
    }
  }

  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into().trim_end_matches('/').to_string();
    self
  }

  pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
    self.client = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout_secs.max(1)))
      .build()
      .unwrap_or_default();
    self
  }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
  model: &'a str,
  max_tokens: u32,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  system: Option<&'a str>,
  messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
  role: &'static str,
  content: Vec<ContentBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock<'a> {
  Image { source: ImageSource<'a> },
  Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
  #[serde(rename = "type")]
  source_type: &'static str,
  media_type: &'static str,
  data: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
  #[serde(default)]
  content: Vec<ResponseContent>,
  usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseContent {
  Text {
    text: String,
  },
  #[serde(other)]
  Other,
}

#[derive(Debug, Deserialize)]
struct Usage {
  #[serde(default)]
  input_tokens: u32,
  #[serde(default)]
  output_tokens: u32,
}

fn build_request(request: &InferenceRequest) -> MessagesRequest<'_> {
  let mut content = Vec::with_capacity(2);
  if let Some(image) = &request.image {
    content.push(ContentBlock::Image {
      source: ImageSource {
        source_type: "base64",
        media_type: "image/png",
        data: image,
      },
    });
  }
  content.push(ContentBlock::Text { text: &request.prompt });

  MessagesRequest {
    model: &request.model,
    max_tokens: request.max_tokens,
    temperature: request.temperature,
    system: request.system_prompt.as_deref(),
    messages: vec![Message { role: "user", content }],
  }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
  fn name(&self) -> &str {
    "anthropic"
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
      "Starting messages request"
    );

    let response = self
      .client
      .post(format!("{}/v1/messages", self.base_url))
      .header("x-api-key", &self.api_key)
      .header("anthropic-version", ANTHROPIC_VERSION)
      .json(&body)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      warn!(status = status.as_u16(), "Messages request failed");
      return Err(LlmError::Api {
        status: status.as_u16(),
        body,
      });
    }

    let raw = response.text().await?;
    trace!(response_len = raw.len(), "Received messages response");
    let parsed: MessagesResponse = serde_json::from_str(&raw)?;

    let text = parsed
      .content
      .into_iter()
      .find_map(|block| match block {
        ResponseContent::Text { text } => Some(text),
        ResponseContent::Other => None,
      })
      .filter(|t| !t.trim().is_empty())
      .ok_or(LlmError::EmptyResponse)?;

    let (input_tokens, output_tokens) = parsed
      .usage
      .map(|u| (u.input_tokens, u.output_tokens))
      .unwrap_or_default();

    Ok(InferenceResponse {
      text,
      input_tokens,
      output_tokens,
      duration_ms: start.elapsed().as_millis() as u64,
    })
  }
}
