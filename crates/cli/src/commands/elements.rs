//! Element extraction command

use anyhow::{Result, anyhow};
use screenforge::{Config, GenerationOptions};
use std::path::Path;
use tracing::error;

use super::{open_service, read_image};
use crate::format::print_element_batch;

/// Describe an image as primitive elements and persist them into a view
pub async fn cmd_elements(
  config: Config,
  image: &Path,
  view: &str,
  store: &Path,
  instructions: Option<String>,
  json: bool,
) -> Result<()> {
  let image = read_image(image)?;
  let service = open_service(config, Some(store)).await?;

  let mut options = GenerationOptions::default();
  if let Some(instructions) = instructions {
    options = options.with_instructions(instructions);
  }

  let batch = match service.extract_elements(&image, view, &options).await {
    Ok(batch) => batch,
    Err(e) => {
      error!(error = %e, view = %view, "Element extraction failed");
      return Err(anyhow!(e.user_message()));
    }
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&batch)?);
  } else {
    print_element_batch(&batch, view);
  }

  Ok(())
}
