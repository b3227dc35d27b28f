//! Code generation command

use anyhow::{Result, anyhow};
use screenforge::{Config, GenerationOptions};
use std::path::PathBuf;
use tracing::{error, info};

use super::{open_service, read_image, write_files};
use crate::format::print_generation_summary;

/// Arguments for `screenforge generate`
pub struct GenerateArgs {
  pub image: Option<PathBuf>,
  pub prompt: Option<String>,
  pub app_name: Option<String>,
  pub instructions: Option<String>,
  pub out: Option<PathBuf>,
  pub project: Option<String>,
  pub store: Option<PathBuf>,
  pub json: bool,
}

impl GenerateArgs {
  fn options(&self) -> GenerationOptions {
    let mut options = GenerationOptions::default();
    if let Some(name) = &self.app_name {
      options = options.with_app_name(name.clone());
    }
    if let Some(instructions) = &self.instructions {
      options = options.with_instructions(instructions.clone());
    }
    options
  }
}

/// Generate Flutter code from an image or a prompt
pub async fn cmd_generate(config: Config, args: GenerateArgs) -> Result<()> {
  let out_dir = args.out.clone().unwrap_or_else(|| config.output.directory.clone());
  let options = args.options();
  let service = open_service(config, args.store.as_deref()).await?;

  let result = match (&args.image, &args.prompt) {
    (Some(path), _) => {
      let image = read_image(path)?;
      service.generate_from_image(&image, &options).await
    }
    (None, Some(prompt)) => service.generate_from_prompt(prompt, &options).await,
    (None, None) => {
      error!("Either --image or --prompt is required");
      std::process::exit(1);
    }
  };

  let mut output = match result {
    Ok(output) => output,
    Err(e) => {
      error!(error = %e, "Generation failed");
      return Err(anyhow!(e.user_message()));
    }
  };

  if let Some(project) = &args.project {
    match service.generate_navigation(project, &options).await {
      Ok(Some(navigation)) => output.bundle.navigation = Some(navigation),
      Ok(None) => info!(project = %project, "Project has too few views for navigation"),
      Err(e) => {
        error!(error = %e, project = %project, "Navigation failed");
        return Err(anyhow!(e.user_message()));
      }
    }
  }

  if args.json {
    println!("{}", serde_json::to_string_pretty(&output.bundle)?);
    return Ok(());
  }

  let files = output.bundle.files();
  write_files(&out_dir, &files)?;
  print_generation_summary(&output, &out_dir, files.len());

  Ok(())
}
