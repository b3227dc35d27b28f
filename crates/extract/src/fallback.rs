//! Signature-based extraction for responses without usable file tags
//!
//! Pulls class definitions straight out of the response text by what they
//! declare, and as a last resort builds a widget that shows the failure.

use std::sync::LazyLock;

use forge_core::{Artifact, ArtifactKind, GenerationBundle, MAIN_ENTRY_NAME};
use regex::Regex;
use tracing::debug;

use crate::fence::scan_fences;
use crate::signature::{is_screen_name, is_service_name};
use crate::text::{brace_block_end, dart_string, snake_case, truncate_chars};

const MATERIAL_IMPORT: &str = "import 'package:flutter/material.dart';";

/// Name of the widget produced when nothing could be extracted
pub const PLACEHOLDER_NAME: &str = "generation_error_widget";

static MAIN_FN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\bvoid\s+main\s*\(").expect("valid main function pattern"));

static WIDGET_CLASS: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\bclass\s+(\w+)\s+extends\s+(StatelessWidget|StatefulWidget)\b").expect("valid widget class pattern")
});

static PLAIN_CLASS: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\bclass\s+(\w+)\s*\{").expect("valid plain class pattern"));

static SERVICE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\bclass\s+(\w+(?:Service|Provider|Repository|Client|Api))\b").expect("valid service class pattern")
});

/// Text of the class starting at `start`, through its closing brace
fn class_source(text: &str, start: usize) -> &str {
  text[start..brace_block_end(text, start)].trim_end()
}

/// The `State` class paired with a stateful widget, if present
fn state_class<'a>(text: &'a str, widget: &str) -> Option<&'a str> {
  let pattern = format!(
    r"\bclass\s+_?{}State\s+extends\s+State<{}>",
    regex::escape(widget),
    regex::escape(widget)
  );
  let re = Regex::new(&pattern).ok()?;
  re.find(text).map(|m| class_source(text, m.start()))
}

/// The fenced block containing or nearest to `offset`, else the brace block there
fn main_entry_source(text: &str, offset: usize) -> String {
  let fences = scan_fences(text);
  match fences.iter().min_by_key(|f| f.distance_to(offset)) {
    Some(fence) => fence.body.trim().to_string(),
    None => class_source(text, offset).to_string(),
  }
}

fn with_material_import(code: &str) -> String {
  if code.contains("package:flutter/") {
    code.to_string()
  } else {
    format!("{}\n\n{}", MATERIAL_IMPORT, code)
  }
}

/// Build a bundle from class signatures found anywhere in `text`
pub fn extract_by_class_signatures(text: &str) -> GenerationBundle {
  let mut bundle = GenerationBundle::new();

  if let Some(m) = MAIN_FN.find(text) {
    bundle.main_entry = Some(Artifact::new(MAIN_ENTRY_NAME, main_entry_source(text, m.start())));
    debug!(offset = m.start(), "Found main entry signature");
  }

  for caps in WIDGET_CLASS.captures_iter(text) {
    let (Some(whole), Some(name), Some(base)) = (caps.get(0), caps.get(1), caps.get(2)) else {
      continue;
    };
    let name = name.as_str();
    let mut code = class_source(text, whole.start()).to_string();
    if base.as_str() == "StatefulWidget"
      && let Some(state) = state_class(text, name)
    {
      code.push_str("\n\n");
      code.push_str(state);
    }

    let kind = if is_screen_name(name) {
      ArtifactKind::Screen
    } else {
      ArtifactKind::Widget
    };
    bundle.push(kind, Artifact::new(snake_case(name), with_material_import(&code)));
  }

  for caps in PLAIN_CLASS.captures_iter(text) {
    let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
      continue;
    };
    let name = name.as_str();
    if is_service_name(name) {
      continue;
    }
    let code = class_source(text, whole.start());
    let has_constructor = code.contains(&format!("{}(", name));
    if code.contains("final ") || has_constructor {
      bundle.push(ArtifactKind::Model, Artifact::new(snake_case(name), code));
    }
  }

  for caps in SERVICE_CLASS.captures_iter(text) {
    let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
      continue;
    };
    let code = class_source(text, whole.start());
    bundle.push(ArtifactKind::Service, Artifact::new(snake_case(name.as_str()), code));
  }

  debug!(
    artifacts = bundle.artifact_count(),
    has_main = bundle.main_entry.is_some(),
    "Signature extraction finished"
  );
  bundle
}

/// A widget that shows an error and the start of the raw response
pub fn placeholder_widget(raw: &str, excerpt_chars: usize) -> Artifact {
  let excerpt = dart_string(truncate_chars(raw.trim(), excerpt_chars));
  let code = format!(
    r#"{import}

class GenerationErrorWidget extends StatelessWidget {{
  const GenerationErrorWidget({{super.key}});

  @override
  Widget build(BuildContext context) {{
    return Scaffold(
      body: SafeArea(
        child: SingleChildScrollView(
          padding: const EdgeInsets.all(24),
          child: Column(
            crossAxisAlignment: CrossAxisAlignment.start,
            children: const [
              Icon(Icons.error_outline, color: Colors.red, size: 48),
              SizedBox(height: 16),
              Text(
                'Could not extract Flutter code from the model response.',
                style: TextStyle(fontSize: 18, fontWeight: FontWeight.bold),
              ),
              SizedBox(height: 16),
              Text(
                {excerpt},
                style: TextStyle(fontFamily: 'monospace', fontSize: 12),
              ),
            ],
          ),
        ),
      ),
    );
  }}
}}
"#,
    import = MATERIAL_IMPORT,
    excerpt = excerpt,
  );
  Artifact::new(PLACEHOLDER_NAME, code)
}

/// Bundle holding only the placeholder widget
pub fn placeholder_bundle(raw: &str, excerpt_chars: usize) -> GenerationBundle {
  let mut bundle = GenerationBundle::new();
  bundle.push(ArtifactKind::Widget, placeholder_widget(raw, excerpt_chars));
  bundle
}
