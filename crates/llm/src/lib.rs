use forge_core::LlmConfig;

mod anthropic;
pub mod image;
mod openai;
pub mod prompts;
mod provider;
pub mod request;

pub use anthropic::AnthropicProvider;
pub use image::{ImageInput, prepare_image};
pub use openai::OpenAiProvider;
pub use prompts::GenerationOptions;
pub use provider::{LlmProvider, Result};
pub use request::{CodeSource, RequestSettings, describe_elements, generate_code};

/// Create the LLM provider named in the config
///
/// Returns an error if the provider name is unknown or no API key can be found.
pub fn create_provider(config: &LlmConfig) -> Result<Box<dyn LlmProvider>> {
  let api_key = config.resolve_api_key();

  match config.provider.to_lowercase().as_str() {
    "openai" => {
      let api_key = api_key.ok_or(LlmError::MissingApiKey("openai"))?;
      let mut provider = OpenAiProvider::new(api_key).with_timeout_secs(config.timeout_secs);
      if let Some(base_url) = &config.base_url {
        provider = provider.with_base_url(base_url);
      }
      Ok(Box::new(provider))
    }
    "anthropic" | "claude" => {
      let api_key = api_key.ok_or(LlmError::MissingApiKey("anthropic"))?;
      let mut provider = AnthropicProvider::new(api_key).with_timeout_secs(config.timeout_secs);
      if let Some(base_url) = &config.base_url {
        provider = provider.with_base_url(base_url);
      }
      Ok(Box::new(provider))
    }
    other => Err(LlmError::UnknownProvider(other.to_string())),
  }
}

/// Request for LLM inference
#[derive(Debug, Clone, Default)]
pub struct InferenceRequest {
  /// The user instruction
  pub prompt: String,
  /// Optional system instruction
  pub system_prompt: Option<String>,
  /// Optional image as a bare base64 payload (sent as PNG)
  pub image: Option<String>,
  /// Model to use
  pub model: String,
  /// Maximum tokens to generate
  pub max_tokens: u32,
  /// Sampling temperature
  pub temperature: f32,
}

impl InferenceRequest {
  pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
    Self {
      prompt: prompt.into(),
      system_prompt: None,
      image: None,
      model: model.into(),
      max_tokens: 4096,
      temperature: 0.2,
    }
  }
}

/// Response from LLM inference
#[derive(Debug, Clone, Default)]
pub struct InferenceResponse {
  /// The text response
  pub text: String,
  /// Input tokens used
  pub input_tokens: u32,
  /// Output tokens generated
  pub output_tokens: u32,
  /// Duration in milliseconds
  pub duration_ms: u64,
}

/// Errors that can occur during LLM inference
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
  #[error("HTTP request failed: {0}")]
  Http(#[from] reqwest::Error),
  #[error("API returned {status}: {body}")]
  Api { status: u16, body: String },
  #[error("Failed to parse JSON response: {0}")]
  Parse(#[from] serde_json::Error),
  #[error("LLM returned no content")]
  EmptyResponse,
  #[error("No API key configured for provider '{0}'")]
  MissingApiKey(&'static str),
  #[error("Unknown LLM provider: {0}")]
  UnknownProvider(String),
  #[error("Unsupported image format: {0}")]
  UnsupportedImageFormat(String),
}
