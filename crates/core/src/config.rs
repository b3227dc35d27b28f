//! Configuration system for screenforge.
//!
//! Config priority: working directory (.screenforge.toml) > user (~/.config/screenforge/config.toml) > defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// File name of the per-directory config
pub const PROJECT_CONFIG_FILE: &str = ".screenforge.toml";

/// Ordered keywords used to pick the initial route of a multi-view project.
/// Earlier keywords win over later ones, regardless of view order.
pub const DEFAULT_INITIAL_ROUTE_KEYWORDS: &[&str] = &[
  "login",
  "signin",
  "auth",
  "welcome",
  "onboarding",
  "splash",
  "home",
  "dashboard",
  "main",
  "inicio",
  "principal",
];

// ============================================================================
// LLM Configuration
// ============================================================================

/// Upstream LLM settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
  /// Provider: openai (any OpenAI-compatible endpoint) or anthropic
  pub provider: String,

  /// Model name (e.g., "gpt-4o", "claude-sonnet-4-5")
  pub model: String,

  /// Base URL of the API (provider default when not set)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub base_url: Option<String>,

  /// API key. If not set, reads OPENAI_API_KEY or ANTHROPIC_API_KEY
  #[serde(skip_serializing_if = "Option::is_none")]
  pub api_key: Option<String>,

  /// Maximum tokens to generate per completion
  pub max_tokens: u32,

  /// Sampling temperature
  pub temperature: f32,

  /// HTTP timeout for one completion call (seconds)
  pub timeout_secs: u64,
}

impl Default for LlmConfig {
  fn default() -> Self {
    Self {
      provider: "openai".to_string(),
      model: "gpt-4o".to_string(),
      base_url: None,
      api_key: None,
      max_tokens: 4096,
      temperature: 0.2,
      timeout_secs: 120,
    }
  }
}

impl LlmConfig {
  /// Environment variable holding the API key for the configured provider
  pub fn api_key_env_var(&self) -> &'static str {
    match self.provider.to_lowercase().as_str() {
      "anthropic" | "claude" => "ANTHROPIC_API_KEY",
      _ => "OPENAI_API_KEY",
    }
  }

  /// Configured key, falling back to the provider's environment variable
  pub fn resolve_api_key(&self) -> Option<String> {
    self
      .api_key
      .clone()
      .filter(|k| !k.trim().is_empty())
      .or_else(|| std::env::var(self.api_key_env_var()).ok())
      .filter(|k| !k.trim().is_empty())
  }
}

// ============================================================================
// Generation Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
  /// Title used in synthesized bootstrap files
  pub app_title: String,

  /// Characters of raw response quoted in the placeholder widget (default: 500)
  pub placeholder_excerpt_chars: usize,
}

impl Default for GenerationConfig {
  fn default() -> Self {
    Self {
      app_title: "Generated App".to_string(),
      placeholder_excerpt_chars: 500,
    }
  }
}

// ============================================================================
// Navigation Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
  /// Minimum number of views before navigation is generated (default: 2)
  pub min_views: usize,

  /// Ordered keywords for initial route selection
  pub initial_route_keywords: Vec<String>,
}

impl Default for NavigationConfig {
  fn default() -> Self {
    Self {
      min_views: 2,
      initial_route_keywords: DEFAULT_INITIAL_ROUTE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
    }
  }
}

// ============================================================================
// Logging & Output Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
  /// Log level: error, warn, info, debug, trace (RUST_LOG overrides)
  pub level: String,

  /// Log to this file instead of stderr
  #[serde(skip_serializing_if = "Option::is_none")]
  pub file: Option<PathBuf>,

  /// Rotation for file logging: daily, hourly, never
  pub rotation: String,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: "info".to_string(),
      file: None,
      rotation: "daily".to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
  /// Directory generated projects are written to
  pub directory: PathBuf,
}

impl Default for OutputConfig {
  fn default() -> Self {
    Self {
      directory: PathBuf::from("generated"),
    }
  }
}

// ============================================================================
// Main Configuration
// ============================================================================

/// screenforge configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Upstream LLM settings
  #[serde(default)]
  pub llm: LlmConfig,

  /// Code generation settings
  #[serde(default)]
  pub generation: GenerationConfig,

  /// Navigation synthesis settings
  #[serde(default)]
  pub navigation: NavigationConfig,

  /// Logging settings
  #[serde(default)]
  pub logging: LoggingConfig,

  /// Output settings
  #[serde(default)]
  pub output: OutputConfig,
}

impl Config {
  /// Load config for a working directory, falling back to user config, then defaults
  pub fn load_for_dir(dir: &Path) -> Self {
    let local = Self::project_config_path(dir);
    if local.exists()
      && let Ok(content) = std::fs::read_to_string(&local)
      && let Ok(config) = toml::from_str(&content)
    {
      return config;
    }

    if let Some(user_config_path) = Self::user_config_path()
      && user_config_path.exists()
      && let Ok(content) = std::fs::read_to_string(&user_config_path)
      && let Ok(config) = toml::from_str(&content)
    {
      return config;
    }

    Self::default()
  }

  /// Parse a specific config file, reporting errors instead of falling back
  pub fn from_file(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
  }

  /// Get the user-level config path
  pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("SCREENFORGE_CONFIG_DIR") {
      return Some(PathBuf::from(path).join("config.toml"));
    }

    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
      return Some(PathBuf::from(path).join("screenforge").join("config.toml"));
    }

    dirs::config_dir().map(|p: PathBuf| p.join("screenforge").join("config.toml"))
  }

  /// Get the per-directory config path
  pub fn project_config_path(dir: &Path) -> PathBuf {
    dir.join(PROJECT_CONFIG_FILE)
  }

  /// Write this config as TOML, creating parent directories
  pub fn save(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
    std::fs::write(path, content)?;
    Ok(())
  }

  /// Generate a default config file as a string
  pub fn generate_template() -> String {
    let keywords = DEFAULT_INITIAL_ROUTE_KEYWORDS
      .iter()
      .map(|k| format!("\"{}\"", k))
      .collect::<Vec<_>>()
      .join(", ");

    format!(
      r#"# screenforge Configuration
# Place in .screenforge.toml (working directory) or ~/.config/screenforge/config.toml (user)

# ============================================================================
# LLM Provider
# ============================================================================

[llm]
# Provider: openai (any OpenAI-compatible endpoint) or anthropic
provider = "openai"

# Model name (must accept image input for image-based generation)
model = "gpt-4o"

# Base URL (uncomment to point at a compatible gateway)
# base_url = "https://api.openai.com"

# API key. Can also be set via OPENAI_API_KEY / ANTHROPIC_API_KEY
# api_key = "sk-..."

max_tokens = 4096
temperature = 0.2

# HTTP timeout for one completion (seconds)
timeout_secs = 120

# ============================================================================
# Code Generation
# ============================================================================

[generation]
# Title used in synthesized main.dart files
app_title = "Generated App"

# Characters of the raw response quoted when nothing could be extracted
placeholder_excerpt_chars = 500

# ============================================================================
# Navigation
# ============================================================================

[navigation]
# Navigation is only generated for projects with at least this many views
min_views = 2

# Keywords tried in order; the first keyword matching any view name picks the initial route
initial_route_keywords = [{keywords}]

# ============================================================================
# Logging
# ============================================================================

[logging]
# error, warn, info, debug, trace (RUST_LOG overrides)
level = "info"

# Log to a file instead of stderr (uncomment to use)
# file = "/var/log/screenforge/screenforge.log"

# Rotation for file logging: daily, hourly, never
rotation = "daily"

# ============================================================================
# Output
# ============================================================================

[output]
directory = "generated"
"#
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.llm.provider, "openai");
    assert_eq!(config.llm.max_tokens, 4096);
    assert_eq!(config.generation.placeholder_excerpt_chars, 500);
    assert_eq!(config.navigation.min_views, 2);
    assert_eq!(config.navigation.initial_route_keywords[0], "login");
    assert_eq!(config.navigation.initial_route_keywords.len(), 11);
    assert_eq!(config.logging.level, "info");
  }

  #[test]
  fn test_template_parses_to_defaults() {
    let template = Config::generate_template();
    let parsed: Config = toml::from_str(&template).unwrap();
    assert_eq!(parsed, Config::default());
  }

  #[test]
  fn test_partial_config_uses_defaults() {
    let toml_content = r#"
[llm]
provider = "anthropic"
model = "claude-sonnet-4-5"
"#;
    let config: Config = toml::from_str(toml_content).unwrap();
    assert_eq!(config.llm.provider, "anthropic");
    assert_eq!(config.llm.api_key_env_var(), "ANTHROPIC_API_KEY");
    assert_eq!(config.llm.timeout_secs, 120);
    assert_eq!(config.generation, GenerationConfig::default());
  }

  #[test]
  fn test_explicit_api_key_wins() {
    let config = LlmConfig {
      api_key: Some("sk-test".to_string()),
      ..Default::default()
    };
    assert_eq!(config.resolve_api_key().as_deref(), Some("sk-test"));
  }

  #[test]
  fn test_save_and_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
      navigation: NavigationConfig {
        min_views: 3,
        initial_route_keywords: vec!["start".to_string()],
      },
      ..Default::default()
    };

    config.save(&Config::project_config_path(dir.path())).unwrap();
    let loaded = Config::load_for_dir(dir.path());
    assert_eq!(loaded.navigation.min_views, 3);
    assert_eq!(loaded.navigation.initial_route_keywords, vec!["start".to_string()]);
  }

  #[test]
  fn test_from_file_reports_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[llm\nprovider = ").unwrap();
    assert!(matches!(Config::from_file(&path), Err(Error::Config(_))));
  }
}
