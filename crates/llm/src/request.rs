//! Request builder: assemble prompts, embed the prepared image and call the provider
//!
//! Both entry points return the provider's raw completion text untouched;
//! parsing happens downstream and must tolerate anything in it.

use forge_core::LlmConfig;
use tracing::{debug, info};

use crate::{
  ImageInput, InferenceRequest, InferenceResponse, LlmProvider, Result, prepare_image,
  prompts::{
    CODE_SYSTEM_PROMPT, ELEMENTS_SYSTEM_PROMPT, GenerationOptions, build_elements_prompt, build_image_code_prompt,
    build_text_code_prompt,
  },
};

/// Model parameters applied to every request
#[derive(Debug, Clone)]
pub struct RequestSettings {
  pub model: String,
  pub max_tokens: u32,
  pub temperature: f32,
}

impl Default for RequestSettings {
  fn default() -> Self {
    Self::from(&LlmConfig::default())
  }
}

impl From<&LlmConfig> for RequestSettings {
  fn from(config: &LlmConfig) -> Self {
    Self {
      model: config.model.clone(),
      max_tokens: config.max_tokens,
      temperature: config.temperature,
    }
  }
}

/// What the code is generated from
#[derive(Debug, Clone, Copy)]
pub enum CodeSource<'a> {
  Image(&'a ImageInput),
  Prompt(&'a str),
}

/// Ask the provider for Flutter code
pub async fn generate_code(
  provider: &dyn LlmProvider,
  source: CodeSource<'_>,
  options: &GenerationOptions,
  settings: &RequestSettings,
) -> Result<InferenceResponse> {
  let (prompt, image) = match source {
    CodeSource::Image(input) => (build_image_code_prompt(options), Some(prepare_image(input)?)),
    CodeSource::Prompt(description) => (build_text_code_prompt(description, options), None),
  };

  debug!(
    provider = provider.name(),
    model = %settings.model,
    has_image = image.is_some(),
    image_len = image.as_ref().map(|i| i.len()).unwrap_or(0),
    "Requesting code generation"
  );

  let request = InferenceRequest {
    prompt,
    system_prompt: Some(CODE_SYSTEM_PROMPT.to_string()),
    image,
    model: settings.model.clone(),
    max_tokens: settings.max_tokens,
    temperature: settings.temperature,
  };

  let response = provider.infer(request).await?;
  info!(
    response_len = response.text.len(),
    input_tokens = response.input_tokens,
    output_tokens = response.output_tokens,
    duration_ms = response.duration_ms,
    "Code generation completed"
  );
  Ok(response)
}

/// Ask the provider to describe the image as a JSON array of UI elements
pub async fn describe_elements(
  provider: &dyn LlmProvider,
  image: &ImageInput,
  options: &GenerationOptions,
  settings: &RequestSettings,
) -> Result<InferenceResponse> {
  let image = prepare_image(image)?;

  debug!(
    provider = provider.name(),
    model = %settings.model,
    image_len = image.len(),
    "Requesting element extraction"
  );

  let request = InferenceRequest {
    prompt: build_elements_prompt(options),
    system_prompt: Some(ELEMENTS_SYSTEM_PROMPT.to_string()),
    image: Some(image),
    model: settings.model.clone(),
    max_tokens: settings.max_tokens,
    // shapes should be reproducible
    temperature: 0.0,
  };

  let response = provider.infer(request).await?;
  debug!(
    response_len = response.text.len(),
    duration_ms = response.duration_ms,
    "Element extraction completed"
  );
  Ok(response)
}
