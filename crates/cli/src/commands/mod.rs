//! CLI command implementations

mod config;
mod elements;
mod generate;
mod navigation;

use anyhow::{Context, Result};
use forge_core::GeneratedFile;
use screenforge::store::{FigureStore, JsonFileStore, ViewStore};
use screenforge::{Config, GenerationService, ImageInput, create_provider};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub use config::{cmd_config_init, cmd_config_reset, cmd_config_show};
pub use elements::cmd_elements;
pub use generate::{GenerateArgs, cmd_generate};
pub use navigation::cmd_navigation;

/// Read an image file.
///
/// Text files holding a data URI or bare base64 (`.b64`, `.txt`) are passed
/// through as encoded payloads; everything else is sent as raw bytes.
pub(crate) fn read_image(path: &Path) -> Result<ImageInput> {
  let bytes = std::fs::read(path).with_context(|| format!("Failed to read image {:?}", path))?;

  let textual = matches!(
    path.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase()).as_deref(),
    Some("b64" | "txt")
  );
  if textual || bytes.starts_with(b"data:") {
    let text = String::from_utf8(bytes).with_context(|| format!("{:?} is not valid UTF-8", path))?;
    return Ok(ImageInput::Encoded(text.trim().to_string()));
  }

  Ok(ImageInput::Binary(bytes))
}

/// Build the generation service, wiring a JSON store when one is given
pub(crate) async fn open_service(config: Config, store: Option<&Path>) -> Result<GenerationService> {
  let provider = create_provider(&config.llm).context("Failed to create LLM provider")?;
  debug!(provider = %config.llm.provider, model = %config.llm.model, "Provider ready");
  let service = GenerationService::new(Arc::from(provider), Arc::new(config));

  let Some(path) = store else {
    return Ok(service);
  };
  let store = Arc::new(
    JsonFileStore::open(path)
      .await
      .with_context(|| format!("Failed to open store {:?}", path))?,
  );
  Ok(service.with_collaborators(store.clone() as Arc<dyn ViewStore>, store as Arc<dyn FigureStore>))
}

/// Write generated files under `out`, creating directories as needed
pub(crate) fn write_files(out: &Path, files: &[GeneratedFile]) -> Result<()> {
  for file in files {
    let path = out.join(&file.path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }
    std::fs::write(&path, &file.content).with_context(|| format!("Failed to write {:?}", path))?;
    debug!(path = %path.display(), bytes = file.content.len(), "Wrote file");
  }
  Ok(())
}
