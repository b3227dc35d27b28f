//! Configuration commands

use anyhow::{Context, Result};
use screenforge::Config;
use std::path::Path;
use tracing::{error, warn};

/// Show the effective configuration
pub fn cmd_config_show(cwd: &Path, config: &Config) -> Result<()> {
  let project_config = Config::project_config_path(cwd);
  let user_config = Config::user_config_path();

  println!("Effective configuration for: {:?}", cwd);
  println!();

  println!("{}", config_source(&project_config, user_config.as_deref()));
  println!();

  let toml_str = toml::to_string_pretty(config)?;
  println!("{}", toml_str);

  Ok(())
}

/// Describe which config file is in effect.
///
/// Files that exist but fail to parse are skipped by the loader, so they are
/// reported here with the parse error.
fn config_source(project_config: &Path, user_config: Option<&Path>) -> String {
  let mut notes = Vec::new();
  for (label, path) in [("project", Some(project_config)), ("user", user_config)] {
    let Some(path) = path.filter(|p| p.exists()) else {
      continue;
    };
    match Config::from_file(path) {
      Ok(_) => {
        notes.push(format!("Using {} config: {:?}", label, path));
        return notes.join("\n");
      }
      Err(e) => {
        warn!(path = %path.display(), error = %e, "Ignoring unreadable config");
        notes.push(format!("Ignoring {} config: {}", label, e));
      }
    }
  }
  notes.push("Using default configuration".to_string());
  notes.join("\n")
}

/// Write the commented configuration template
pub fn cmd_config_init(cwd: &Path, user: bool, force: bool) -> Result<()> {
  let config_path = if user {
    match Config::user_config_path() {
      Some(path) => path,
      None => {
        error!("Could not determine the user config directory");
        std::process::exit(1);
      }
    }
  } else {
    Config::project_config_path(cwd)
  };

  if config_path.exists() && !force {
    error!("Config file already exists: {:?}", config_path);
    println!("Pass --force to overwrite it");
    std::process::exit(1);
  }

  if let Some(parent) = config_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(&config_path, Config::generate_template())
    .with_context(|| format!("Failed to write {:?}", config_path))?;

  println!("Created config: {:?}", config_path);
  println!();
  println!("Set OPENAI_API_KEY or ANTHROPIC_API_KEY, or edit the [llm] section.");

  Ok(())
}

/// Reset the user configuration to defaults
pub fn cmd_config_reset() -> Result<()> {
  let Some(config_path) = Config::user_config_path() else {
    error!("Could not determine the user config directory");
    std::process::exit(1);
  };

  Config::default()
    .save(&config_path)
    .with_context(|| format!("Failed to write {:?}", config_path))?;
  println!("Reset user config to defaults: {:?}", config_path);

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use tempfile::TempDir;

  #[test]
  fn test_config_source_prefers_project_file() {
    let dir = TempDir::new().unwrap();
    let project = Config::project_config_path(dir.path());
    Config::default().save(&project).unwrap();

    let source = config_source(&project, None);
    assert_eq!(source, format!("Using project config: {:?}", project));
  }

  #[test]
  fn test_config_source_reports_broken_file() {
    let dir = TempDir::new().unwrap();
    let project = Config::project_config_path(dir.path());
    std::fs::write(&project, "[llm\nprovider = ").unwrap();
    let user = dir.path().join("user.toml");
    Config::default().save(&user).unwrap();

    let source = config_source(&project, Some(&user));
    let lines: Vec<&str> = source.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Ignoring project config: "));
    assert!(lines[0].contains(".screenforge.toml"));
    assert_eq!(lines[1], format!("Using user config: {:?}", user));
  }

  #[test]
  fn test_config_source_without_files_is_default() {
    let dir = TempDir::new().unwrap();
    let project = Config::project_config_path(dir.path());
    assert_eq!(config_source(&project, Some(&dir.path().join("missing.toml"))), "Using default configuration");
  }
}
