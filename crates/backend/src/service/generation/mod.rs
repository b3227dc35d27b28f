//! Generation service.
//!
//! Orchestrates one request end to end: build the prompt, call the model
//! once, then hand the raw completion to the extraction pipeline. There is
//! no retry; a failed upstream call fails the request.
//!
//! ## Available Operations
//!
//! - [`GenerationService::generate_from_image`] - Flutter code from a UI image
//! - [`GenerationService::generate_from_prompt`] - Flutter code from a description
//! - [`GenerationService::extract_elements`] - UI shapes from an image, persisted per element
//! - [`GenerationService::generate_navigation`] - routes and routing files for a project

mod elements;
mod navigation;

use std::sync::Arc;

use extract::{PipelineOutput, PipelineSettings, build_bundle, text::truncate_chars};
use forge_core::Config;
use llm::{CodeSource, GenerationOptions, ImageInput, LlmProvider, RequestSettings, generate_code};
use tracing::{debug, info};

pub use self::elements::{ElementBatch, SkippedElement};
use crate::{
  service::util::ServiceError,
  store::{FigureStore, ViewStore},
};

/// Dependencies for generation requests.
///
/// The view and figure collaborators are only needed by the element and
/// navigation paths; without them those operations fail with
/// [`ServiceError::DependencyUnavailable`].
#[derive(Clone)]
pub struct GenerationService {
  provider: Arc<dyn LlmProvider>,
  config: Arc<Config>,
  views: Option<Arc<dyn ViewStore>>,
  figures: Option<Arc<dyn FigureStore>>,
}

impl GenerationService {
  pub fn new(provider: Arc<dyn LlmProvider>, config: Arc<Config>) -> Self {
    Self {
      provider,
      config,
      views: None,
      figures: None,
    }
  }

  pub fn with_collaborators(mut self, views: Arc<dyn ViewStore>, figures: Arc<dyn FigureStore>) -> Self {
    self.views = Some(views);
    self.figures = Some(figures);
    self
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  fn request_settings(&self) -> RequestSettings {
    RequestSettings::from(&self.config.llm)
  }

  fn pipeline_settings(&self, options: &GenerationOptions) -> PipelineSettings {
    let mut settings = PipelineSettings::from(&self.config.generation);
    if let Some(name) = options.app_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
      settings.app_title = name.to_string();
    }
    settings
  }

  fn figures(&self) -> Result<&dyn FigureStore, ServiceError> {
    self
      .figures
      .as_deref()
      .ok_or(ServiceError::DependencyUnavailable("figure store"))
  }

  fn collaborators(&self) -> Result<(&dyn ViewStore, &dyn FigureStore), ServiceError> {
    let views = self
      .views
      .as_deref()
      .ok_or(ServiceError::DependencyUnavailable("view store"))?;
    Ok((views, self.figures()?))
  }

  /// Generate a bundle of Flutter artifacts from a UI image
  pub async fn generate_from_image(
    &self,
    image: &ImageInput,
    options: &GenerationOptions,
  ) -> Result<PipelineOutput, ServiceError> {
    self.generate(CodeSource::Image(image), options).await
  }

  /// Generate a bundle of Flutter artifacts from a text description
  pub async fn generate_from_prompt(
    &self,
    description: &str,
    options: &GenerationOptions,
  ) -> Result<PipelineOutput, ServiceError> {
    self.generate(CodeSource::Prompt(description), options).await
  }

  async fn generate(
    &self,
    source: CodeSource<'_>,
    options: &GenerationOptions,
  ) -> Result<PipelineOutput, ServiceError> {
    if !self.provider.is_available() {
      return Err(ServiceError::DependencyUnavailable("llm provider"));
    }

    let response = generate_code(self.provider.as_ref(), source, options, &self.request_settings()).await?;
    debug!(
      response_len = response.text.len(),
      preview = truncate_chars(&response.text, 200),
      "Received code completion"
    );

    let output = build_bundle(&response.text, &self.pipeline_settings(options));
    info!(
      stage = %output.stage,
      screens = output.bundle.screens.len(),
      widgets = output.bundle.widgets.len(),
      models = output.bundle.models.len(),
      services = output.bundle.services.len(),
      dropped = output.dropped.len(),
      main_synthesized = output.main_synthesized,
      "Generation completed"
    );
    Ok(output)
  }
}
