//! Generated code artifacts and the bundle returned to callers.

use serde::{Deserialize, Serialize};

/// Reserved filename for the application bootstrap
pub const MAIN_ENTRY_FILE: &str = "main.dart";

/// Artifact name of the application bootstrap (filename minus extension)
pub const MAIN_ENTRY_NAME: &str = "main";

/// A fenced code block pulled out of an LLM response.
///
/// Ephemeral: produced by the extractor, consumed by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
  /// Inferred filename, including the `.dart` extension
  pub filename: String,
  pub content: String,
}

impl CodeBlock {
  pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
    Self {
      filename: filename.into(),
      content: content.into(),
    }
  }

  /// Filename without its extension
  pub fn stem(&self) -> &str {
    file_stem(&self.filename)
  }
}

/// Strip the last extension from a filename (`login_screen.dart` -> `login_screen`)
pub fn file_stem(filename: &str) -> &str {
  match filename.rfind('.') {
    Some(idx) if idx > 0 => &filename[..idx],
    _ => filename,
  }
}

/// Category an artifact is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
  Screen,
  Widget,
  Model,
  Service,
}

impl ArtifactKind {
  pub const ALL: [ArtifactKind; 4] = [
    ArtifactKind::Screen,
    ArtifactKind::Widget,
    ArtifactKind::Model,
    ArtifactKind::Service,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      ArtifactKind::Screen => "screen",
      ArtifactKind::Widget => "widget",
      ArtifactKind::Model => "model",
      ArtifactKind::Service => "service",
    }
  }

  /// Directory inside a Flutter project where artifacts of this kind live
  pub fn directory(&self) -> &'static str {
    match self {
      ArtifactKind::Screen => "lib/screens",
      ArtifactKind::Widget => "lib/widgets",
      ArtifactKind::Model => "lib/models",
      ArtifactKind::Service => "lib/services",
    }
  }
}

impl std::fmt::Display for ArtifactKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// A named piece of generated code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
  pub name: String,
  pub code: String,
}

impl Artifact {
  pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      code: code.into(),
    }
  }
}

/// A file ready to be written into a generated project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
  /// Path relative to the project root (e.g. `lib/screens/login_screen.dart`)
  pub path: String,
  pub content: String,
}

impl GeneratedFile {
  pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      content: content.into(),
    }
  }
}

/// Derived route for one view of a multi-view project. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
  /// Lowercase, underscore-separated view name (`user_profile`)
  pub internal_name: String,
  /// Dart constant naming the route (`userProfile`), unique within the table
  pub identifier: String,
  /// Capitalized words plus `Screen` (`UserProfileScreen`), unique within the table
  pub screen_class_name: String,
  /// `/` + internal name
  pub path: String,
  pub is_initial: bool,
  /// The view's display name as given
  pub display_label: String,
  pub element_count: usize,
}

/// Route table plus the routing artifacts generated from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationBundle {
  pub routes: Vec<RouteEntry>,
  pub files: Vec<GeneratedFile>,
}

impl NavigationBundle {
  pub fn initial(&self) -> Option<&RouteEntry> {
    self.routes.iter().find(|r| r.is_initial)
  }
}

/// Artifacts from one generation request, grouped by category.
///
/// Names are unique within each category; sequences keep discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationBundle {
  pub screens: Vec<Artifact>,
  pub widgets: Vec<Artifact>,
  pub models: Vec<Artifact>,
  pub services: Vec<Artifact>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub main_entry: Option<Artifact>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub navigation: Option<NavigationBundle>,
}

impl GenerationBundle {
  pub fn new() -> Self {
    Self::default()
  }

  /// True when no artifact of any category (including the bootstrap) is present
  pub fn is_empty(&self) -> bool {
    self.main_entry.is_none() && ArtifactKind::ALL.iter().all(|k| self.category(*k).is_empty())
  }

  /// Number of categorized artifacts, excluding the bootstrap
  pub fn artifact_count(&self) -> usize {
    ArtifactKind::ALL.iter().map(|k| self.category(*k).len()).sum()
  }

  pub fn category(&self, kind: ArtifactKind) -> &[Artifact] {
    match kind {
      ArtifactKind::Screen => &self.screens,
      ArtifactKind::Widget => &self.widgets,
      ArtifactKind::Model => &self.models,
      ArtifactKind::Service => &self.services,
    }
  }

  fn category_mut(&mut self, kind: ArtifactKind) -> &mut Vec<Artifact> {
    match kind {
      ArtifactKind::Screen => &mut self.screens,
      ArtifactKind::Widget => &mut self.widgets,
      ArtifactKind::Model => &mut self.models,
      ArtifactKind::Service => &mut self.services,
    }
  }

  /// Add an artifact unless its category already holds one with the same name.
  ///
  /// Returns `false` when the artifact was rejected as a duplicate.
  pub fn push(&mut self, kind: ArtifactKind, artifact: Artifact) -> bool {
    let bucket = self.category_mut(kind);
    if bucket.iter().any(|a| a.name == artifact.name) {
      return false;
    }
    bucket.push(artifact);
    true
  }

  /// Lay the bundle out as Flutter project files.
  ///
  /// Navigation files replace earlier files with the same path, so the
  /// routes-based bootstrap wins over the plain one.
  pub fn files(&self) -> Vec<GeneratedFile> {
    let mut files = Vec::with_capacity(self.artifact_count() + 1);

    if let Some(main) = &self.main_entry {
      files.push(GeneratedFile::new(format!("lib/{}", MAIN_ENTRY_FILE), main.code.clone()));
    }

    for kind in ArtifactKind::ALL {
      for artifact in self.category(kind) {
        files.push(GeneratedFile::new(
          format!("{}/{}.dart", kind.directory(), artifact.name),
          artifact.code.clone(),
        ));
      }
    }

    if let Some(navigation) = &self.navigation {
      for file in &navigation.files {
        match files.iter_mut().find(|f| f.path == file.path) {
          Some(existing) => existing.content = file.content.clone(),
          None => files.push(file.clone()),
        }
      }
    }

    files
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_file_stem() {
    assert_eq!(file_stem("login_screen.dart"), "login_screen");
    assert_eq!(file_stem("archive.tar.gz"), "archive.tar");
    assert_eq!(file_stem("README"), "README");
    assert_eq!(file_stem(".hidden"), ".hidden");
  }

  #[test]
  fn test_push_rejects_duplicate_names() {
    let mut bundle = GenerationBundle::new();
    assert!(bundle.push(ArtifactKind::Screen, Artifact::new("home_screen", "a")));
    assert!(!bundle.push(ArtifactKind::Screen, Artifact::new("home_screen", "b")));
    // same name in another category is fine
    assert!(bundle.push(ArtifactKind::Widget, Artifact::new("home_screen", "c")));

    assert_eq!(bundle.screens.len(), 1);
    assert_eq!(bundle.screens[0].code, "a");
    assert_eq!(bundle.artifact_count(), 2);
  }

  #[test]
  fn test_is_empty() {
    let mut bundle = GenerationBundle::new();
    assert!(bundle.is_empty());

    bundle.main_entry = Some(Artifact::new(MAIN_ENTRY_NAME, "void main() {}"));
    assert!(!bundle.is_empty());
    assert_eq!(bundle.artifact_count(), 0);
  }

  #[test]
  fn test_files_layout() {
    let mut bundle = GenerationBundle::new();
    bundle.main_entry = Some(Artifact::new(MAIN_ENTRY_NAME, "old main"));
    bundle.push(ArtifactKind::Screen, Artifact::new("login_screen", "screen"));
    bundle.push(ArtifactKind::Service, Artifact::new("auth_service", "service"));
    bundle.navigation = Some(NavigationBundle {
      routes: Vec::new(),
      files: vec![
        GeneratedFile::new("lib/main.dart", "new main"),
        GeneratedFile::new("lib/navigation/app_routes.dart", "routes"),
      ],
    });

    let files = bundle.files();
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
      paths,
      vec![
        "lib/main.dart",
        "lib/screens/login_screen.dart",
        "lib/services/auth_service.dart",
        "lib/navigation/app_routes.dart",
      ]
    );
    assert_eq!(files[0].content, "new main");
  }

  #[test]
  fn test_bundle_serializes_without_empty_optionals() {
    let bundle = GenerationBundle::new();
    let json = serde_json::to_value(&bundle).unwrap();
    assert!(json.get("main_entry").is_none());
    assert!(json.get("navigation").is_none());
    assert!(json["screens"].as_array().unwrap().is_empty());
  }
}
