//! Sort extracted blocks into artifact categories
//!
//! Filename rules are checked in table order and the first match decides.
//! Blocks whose filename says nothing fall back to a content check; blocks
//! that fail both are dropped and reported back to the caller.

use std::collections::HashSet;

use forge_core::{Artifact, ArtifactKind, CodeBlock, GenerationBundle, MAIN_ENTRY_FILE, MAIN_ENTRY_NAME};
use tracing::{debug, warn};

use crate::signature::{self, Signature};

/// Where a block goes once a rule matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
  MainEntry,
  Kind(ArtifactKind),
}

struct Rule {
  name: &'static str,
  matches: fn(&str) -> bool,
  target: Target,
}

fn is_screen_file(name: &str) -> bool {
  name.contains("screen") || name.contains("page")
}

/// Ordered filename rules, applied to the lowercased filename
static RULES: &[Rule] = &[
  Rule {
    name: "main_entry",
    matches: |name| name == MAIN_ENTRY_FILE,
    target: Target::MainEntry,
  },
  Rule {
    name: "screen",
    matches: is_screen_file,
    target: Target::Kind(ArtifactKind::Screen),
  },
  Rule {
    name: "widget",
    matches: |name| name.contains("widget") && !is_screen_file(name),
    target: Target::Kind(ArtifactKind::Widget),
  },
  Rule {
    name: "model",
    matches: |name| name.contains("model"),
    target: Target::Kind(ArtifactKind::Model),
  },
  Rule {
    name: "service",
    matches: |name| name.contains("service") || name.contains("provider") || name.contains("repository"),
    target: Target::Kind(ArtifactKind::Service),
  },
];

/// Decide where a block belongs, or `None` to drop it
pub fn classify(block: &CodeBlock) -> Option<Target> {
  let filename = block.filename.to_lowercase();
  if let Some(rule) = RULES.iter().find(|r| (r.matches)(&filename)) {
    debug!(filename = %block.filename, rule = rule.name, "Classified by filename");
    return Some(rule.target);
  }

  let target = match signature::detect_component(&block.content)? {
    Signature::Screen => ArtifactKind::Screen,
    Signature::Widget => ArtifactKind::Widget,
    Signature::Model => ArtifactKind::Model,
    Signature::Service => ArtifactKind::Service,
    Signature::AppEntry => return None,
  };
  debug!(filename = %block.filename, kind = %target, "Classified by content");
  Some(Target::Kind(target))
}

/// Result of classifying a set of blocks
#[derive(Debug, Default)]
pub struct Classification {
  pub bundle: GenerationBundle,
  /// Filenames that matched no rule
  pub dropped: Vec<String>,
}

/// Classify every block into a fresh bundle. Each filename is placed at most once.
pub fn classify_blocks(blocks: &[CodeBlock]) -> Classification {
  let mut result = Classification::default();
  let mut processed: HashSet<&str> = HashSet::new();

  for block in blocks {
    if !processed.insert(block.filename.as_str()) {
      continue;
    }

    match classify(block) {
      Some(Target::MainEntry) => {
        if result.bundle.main_entry.is_none() {
          result.bundle.main_entry = Some(Artifact::new(MAIN_ENTRY_NAME, block.content.clone()));
        }
      }
      Some(Target::Kind(kind)) => {
        result.bundle.push(kind, Artifact::new(block.stem(), block.content.clone()));
      }
      None => {
        warn!(filename = %block.filename, "Dropping block that matches no category");
        result.dropped.push(block.filename.clone());
      }
    }
  }

  debug!(
    artifacts = result.bundle.artifact_count(),
    dropped = result.dropped.len(),
    "Classified blocks"
  );
  result
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn block(filename: &str, content: &str) -> CodeBlock {
    CodeBlock::new(filename, content)
  }

  #[test]
  fn test_filename_rules() {
    let cases = [
      ("main.dart", Target::MainEntry),
      ("login_screen.dart", Target::Kind(ArtifactKind::Screen)),
      ("home_page.dart", Target::Kind(ArtifactKind::Screen)),
      ("screen_widget.dart", Target::Kind(ArtifactKind::Screen)),
      ("avatar_widget.dart", Target::Kind(ArtifactKind::Widget)),
      ("user_model.dart", Target::Kind(ArtifactKind::Model)),
      ("auth_service.dart", Target::Kind(ArtifactKind::Service)),
      ("cart_provider.dart", Target::Kind(ArtifactKind::Service)),
      ("user_repository.dart", Target::Kind(ArtifactKind::Service)),
      ("Settings_Screen.dart", Target::Kind(ArtifactKind::Screen)),
    ];
    for (filename, expected) in cases {
      assert_eq!(classify(&block(filename, "")), Some(expected), "{}", filename);
    }
  }

  #[test]
  fn test_content_fallback() {
    assert_eq!(
      classify(&block("utils.dart", "class Avatar extends StatelessWidget {}")),
      Some(Target::Kind(ArtifactKind::Widget))
    );
    assert_eq!(
      classify(&block("api.dart", "class WeatherApi extends Base {}")),
      Some(Target::Kind(ArtifactKind::Service))
    );
    assert_eq!(classify(&block("pubspec.dart", "name: app")), None);
  }

  #[test]
  fn test_classify_blocks_builds_bundle() {
    let blocks = vec![
      block("main.dart", "void main() {}"),
      block("login_screen.dart", "class LoginScreen extends StatelessWidget {}"),
      block("user_model.dart", "class User {}"),
      block("notes.dart", "// nothing here"),
      block("login_screen.dart", "duplicate"),
    ];
    let result = classify_blocks(&blocks);

    assert_eq!(result.bundle.main_entry.as_ref().map(|a| a.code.as_str()), Some("void main() {}"));
    assert_eq!(result.bundle.screens.len(), 1);
    assert_eq!(result.bundle.screens[0].name, "login_screen");
    assert_eq!(result.bundle.screens[0].code, "class LoginScreen extends StatelessWidget {}");
    assert_eq!(result.bundle.models[0].name, "user_model");
    assert_eq!(result.dropped, vec!["notes.dart".to_string()]);
  }

  #[test]
  fn test_no_blocks_gives_empty_bundle() {
    let result = classify_blocks(&[]);
    assert!(result.bundle.is_empty());
    assert!(result.dropped.is_empty());
  }
}
