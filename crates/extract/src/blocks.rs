//! Filename-tagged block extraction
//!
//! A response is expected to contain fenced dart blocks whose first line is
//! a `// <file>.dart` comment. Rules run in priority order and a block is
//! claimed by the first rule that matches it; the first block seen for a
//! filename wins. When nothing is tagged, every fenced block is named from
//! its content instead.

use std::collections::HashSet;
use std::sync::LazyLock;

use forge_core::{CodeBlock, MAIN_ENTRY_FILE};
use regex::Regex;
use tracing::debug;

use crate::fence::{Fence, scan_fences};
use crate::signature::{self, Signature};
use crate::text::snake_case;

struct FilenameRule {
  name: &'static str,
  pattern: LazyLock<Regex>,
}

macro_rules! filename_rule {
  ($name:literal, $suffix:literal) => {
    FilenameRule {
      name: $name,
      pattern: LazyLock::new(|| {
        Regex::new(concat!(r"^\s*//.*?\b([A-Za-z0-9_]*", $suffix, r"\.dart)\b")).expect("valid filename pattern")
      }),
    }
  };
}

/// Ordered most to least specific. The main entry rule runs before these.
static FILENAME_RULES: [FilenameRule; 5] = [
  filename_rule!("screen", "_screen"),
  filename_rule!("widget", "_widget"),
  filename_rule!("model", "_model"),
  filename_rule!("service", "_service"),
  filename_rule!("any", ""),
];

/// `// main.dart`, `// lib/main.dart` or `// File: lib/main.dart`, but not a
/// header that merely mentions main.dart after another filename
static MAIN_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\s*//\s*(?:\w+:\s*)?(?:\S*/)?main\.dart\b").expect("valid main entry pattern")
});

fn block_content(fence: &Fence<'_>) -> String {
  fence.body_after_header().trim().to_string()
}

/// Extract `(filename, content)` pairs from a raw response, in discovery order
pub fn extract_code_blocks(text: &str) -> Vec<CodeBlock> {
  let fences = scan_fences(text);
  let mut blocks = Vec::new();
  let mut seen: HashSet<String> = HashSet::new();
  let mut claimed = vec![false; fences.len()];

  if let Some(idx) = fences.iter().position(|f| f.header().is_some_and(|h| MAIN_ENTRY.is_match(h))) {
    claimed[idx] = true;
    seen.insert(MAIN_ENTRY_FILE.to_string());
    blocks.push(CodeBlock::new(MAIN_ENTRY_FILE, block_content(&fences[idx])));
  }

  for rule in &FILENAME_RULES {
    for (idx, fence) in fences.iter().enumerate() {
      if claimed[idx] {
        continue;
      }
      let Some(header) = fence.header() else {
        continue;
      };
      let Some(filename) = rule.pattern.captures(header).and_then(|c| c.get(1)) else {
        continue;
      };

      claimed[idx] = true;
      let filename = filename.as_str();
      if filename == MAIN_ENTRY_FILE || !seen.insert(filename.to_string()) {
        debug!(filename, rule = rule.name, "Skipping duplicate filename");
        continue;
      }
      blocks.push(CodeBlock::new(filename, block_content(fence)));
    }
  }

  if blocks.is_empty() && !fences.is_empty() {
    debug!(fences = fences.len(), "No tagged blocks, naming fenced blocks by content");
    return name_by_content(&fences);
  }

  debug!(blocks = blocks.len(), fences = fences.len(), "Extracted tagged blocks");
  blocks
}

/// Name untagged blocks from what their content looks like
fn name_by_content(fences: &[Fence<'_>]) -> Vec<CodeBlock> {
  let mut blocks = Vec::new();
  let mut seen: HashSet<String> = HashSet::new();

  for (idx, fence) in fences.iter().enumerate() {
    let content = fence.body.trim();
    if content.is_empty() {
      continue;
    }

    let mut stem = match signature::detect(content) {
      Some(Signature::AppEntry) if !seen.contains(MAIN_ENTRY_FILE) => "main".to_string(),
      Some(Signature::AppEntry) => format!("file_{}", idx + 1),
      Some(sig) => synthesized_stem(content, sig, idx),
      None => format!("file_{}", idx + 1),
    };

    let base = stem.clone();
    let mut n = 2;
    while seen.contains(&format!("{}.dart", stem)) {
      stem = format!("{}_{}", base, n);
      n += 1;
    }

    let filename = format!("{}.dart", stem);
    seen.insert(filename.clone());
    blocks.push(CodeBlock::new(filename, content));
  }

  blocks
}

fn synthesized_stem(content: &str, sig: Signature, idx: usize) -> String {
  let (suffix, markers): (&str, &[&str]) = match sig {
    Signature::Screen => ("screen", &["screen", "page"]),
    Signature::Widget => ("widget", &["widget"]),
    Signature::Model => ("model", &["model"]),
    Signature::Service => ("service", &["service", "provider", "repository"]),
    Signature::AppEntry => return "main".to_string(),
  };

  let class_name = match sig {
    Signature::Screen | Signature::Widget => signature::ui_class_name(content),
    _ => signature::first_class_name(content),
  };

  match class_name.map(snake_case).filter(|s| !s.is_empty()) {
    Some(stem) if markers.iter().any(|m| stem.contains(m)) => stem,
    Some(stem) => format!("{}_{}", stem, suffix),
    None => format!("{}_{}", suffix, idx + 1),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn names(blocks: &[CodeBlock]) -> Vec<&str> {
    blocks.iter().map(|b| b.filename.as_str()).collect()
  }

  #[test]
  fn test_tagged_blocks_by_priority() {
    let text = r#"Here you go:

```dart
// lib/models/user_model.dart
class User {}
```

```dart
// login_screen.dart
class LoginScreen extends StatelessWidget {}
```

```dart
// main.dart
void main() => runApp(App());
```

```dart
// utils.dart
String greet() => 'hi';
```
"#;
    let blocks = extract_code_blocks(text);
    assert_eq!(
      names(&blocks),
      vec!["main.dart", "login_screen.dart", "user_model.dart", "utils.dart"]
    );
    assert_eq!(blocks[1].content, "class LoginScreen extends StatelessWidget {}");
    assert_eq!(blocks[0].content, "void main() => runApp(App());");
  }

  #[test]
  fn test_duplicate_filename_first_wins() {
    let text = "```dart\n// a_widget.dart\nfirst\n```\n```dart\n// a_widget.dart\nsecond\n```\n";
    let blocks = extract_code_blocks(text);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].content, "first");
  }

  #[test]
  fn test_comment_with_prefix_text() {
    let text = "```dart\n// File: lib/services/auth_service.dart\nclass AuthService {}\n```";
    let blocks = extract_code_blocks(text);
    assert_eq!(names(&blocks), vec!["auth_service.dart"]);
  }

  #[test]
  fn test_main_mentioned_in_header_is_not_entry() {
    let text = r#"
```dart
// home_screen.dart (used by main.dart)
class HomeScreen extends StatelessWidget {}
```

```dart
// File: lib/main.dart
void main() => runApp(App());
```
"#;
    let blocks = extract_code_blocks(text);
    assert_eq!(names(&blocks), vec!["main.dart", "home_screen.dart"]);
    assert_eq!(blocks[0].content, "void main() => runApp(App());");
    assert_eq!(blocks[1].content, "class HomeScreen extends StatelessWidget {}");

    let blocks = extract_code_blocks("```dart
// my_main.dart
class Other {}
```");
    assert_eq!(names(&blocks), vec!["my_main.dart"]);
  }

  #[test]
  fn test_untagged_blocks_named_by_content() {
    let text = r#"
```dart
void main() {
  runApp(const MyApp());
}
```

```dart
class CartScreen extends StatefulWidget {}
```

```dart
class PriceTag extends StatelessWidget {}
```

```dart
class Product {
  final String id;
}
```

```yaml
name: shop
```
"#;
    let blocks = extract_code_blocks(text);
    assert_eq!(
      names(&blocks),
      vec![
        "main.dart",
        "cart_screen.dart",
        "price_tag_widget.dart",
        "product_model.dart",
        "file_5.dart"
      ]
    );
  }

  #[test]
  fn test_untagged_duplicates_get_suffix() {
    let text = "```dart\nclass Item {}\n```\n```dart\nclass Item {}\n```\n";
    let blocks = extract_code_blocks(text);
    assert_eq!(names(&blocks), vec!["item_model.dart", "item_model_2.dart"]);
  }

  #[test]
  fn test_no_fences_yields_nothing() {
    assert!(extract_code_blocks("class A extends StatelessWidget {}").is_empty());
  }
}
