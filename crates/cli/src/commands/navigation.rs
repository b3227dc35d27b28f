//! Navigation command

use anyhow::{Result, anyhow};
use screenforge::{Config, GenerationOptions};
use std::path::{Path, PathBuf};
use tracing::error;

use super::{open_service, write_files};
use crate::format::print_navigation_summary;

/// Generate routing files for every view of a project
pub async fn cmd_navigation(
  config: Config,
  project: &str,
  store: &Path,
  out: Option<PathBuf>,
  app_name: Option<String>,
  json: bool,
) -> Result<()> {
  let out_dir = out.unwrap_or_else(|| config.output.directory.clone());
  let min_views = config.navigation.min_views;
  let service = open_service(config, Some(store)).await?;
  let options = match app_name {
    Some(name) => GenerationOptions::default().with_app_name(name),
    None => GenerationOptions::default(),
  };

  let navigation = match service.generate_navigation(project, &options).await {
    Ok(navigation) => navigation,
    Err(e) => {
      error!(error = %e, project = %project, "Navigation failed");
      return Err(anyhow!(e.user_message()));
    }
  };

  let Some(navigation) = navigation else {
    if json {
      println!("null");
    } else {
      println!(
        "Project {} has fewer than {} views; no navigation generated",
        project,
        min_views.max(1)
      );
    }
    return Ok(());
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&navigation)?);
    return Ok(());
  }

  write_files(&out_dir, &navigation.files)?;
  print_navigation_summary(&navigation, &out_dir);

  Ok(())
}
