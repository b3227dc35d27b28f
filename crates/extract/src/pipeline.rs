//! Response to bundle: tagged extraction, then signature extraction, then a
//! placeholder, followed by bootstrap synthesis.
//!
//! Every response produces a non-empty bundle with a main entry.

use forge_core::{GenerationBundle, GenerationConfig};
use tracing::{debug, info, warn};

use crate::blocks::extract_code_blocks;
use crate::classifier::classify_blocks;
use crate::entry::ensure_main_entry;
use crate::fallback::{extract_by_class_signatures, placeholder_bundle};
use crate::text::truncate_chars;

/// Knobs for turning a response into a bundle
#[derive(Debug, Clone)]
pub struct PipelineSettings {
  pub app_title: String,
  pub placeholder_excerpt_chars: usize,
}

impl Default for PipelineSettings {
  fn default() -> Self {
    Self::from(&GenerationConfig::default())
  }
}

impl From<&GenerationConfig> for PipelineSettings {
  fn from(config: &GenerationConfig) -> Self {
    Self {
      app_title: config.app_title.clone(),
      placeholder_excerpt_chars: config.placeholder_excerpt_chars,
    }
  }
}

/// Extraction strategies, most to least precise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  /// Filename-tagged fenced blocks, classified by filename then content
  TaggedBlocks,
  /// Class definitions found anywhere in the text
  ClassSignatures,
  /// A widget that shows the failure
  Placeholder,
}

impl Stage {
  pub fn as_str(&self) -> &'static str {
    match self {
      Stage::TaggedBlocks => "tagged_blocks",
      Stage::ClassSignatures => "class_signatures",
      Stage::Placeholder => "placeholder",
    }
  }

  fn next(self) -> Option<Stage> {
    match self {
      Stage::TaggedBlocks => Some(Stage::ClassSignatures),
      Stage::ClassSignatures => Some(Stage::Placeholder),
      Stage::Placeholder => None,
    }
  }

  fn run(self, text: &str, settings: &PipelineSettings) -> StageOutcome {
    let bundle = match self {
      Stage::TaggedBlocks => {
        let blocks = extract_code_blocks(text);
        let classification = classify_blocks(&blocks);
        return StageOutcome::from_bundle(classification.bundle, classification.dropped);
      }
      Stage::ClassSignatures => extract_by_class_signatures(text),
      Stage::Placeholder => placeholder_bundle(text, settings.placeholder_excerpt_chars),
    };
    StageOutcome::from_bundle(bundle, Vec::new())
  }
}

impl std::fmt::Display for Stage {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

enum StageOutcome {
  Produced { bundle: GenerationBundle, dropped: Vec<String> },
  FallThrough { dropped: Vec<String> },
}

impl StageOutcome {
  fn from_bundle(bundle: GenerationBundle, dropped: Vec<String>) -> Self {
    if bundle.is_empty() {
      StageOutcome::FallThrough { dropped }
    } else {
      StageOutcome::Produced { bundle, dropped }
    }
  }
}

/// A bundle plus how it was obtained
#[derive(Debug, Clone)]
pub struct PipelineOutput {
  pub bundle: GenerationBundle,
  /// Stage that produced the artifacts
  pub stage: Stage,
  /// Filenames of tagged blocks that matched no category
  pub dropped: Vec<String>,
  /// True when `main_entry` was synthesized rather than extracted
  pub main_synthesized: bool,
}

/// Turn a raw model response into a bundle
pub fn build_bundle(text: &str, settings: &PipelineSettings) -> PipelineOutput {
  let mut stage = Stage::TaggedBlocks;
  let mut dropped = Vec::new();

  let mut bundle = loop {
    match stage.run(text, settings) {
      StageOutcome::Produced { bundle, dropped: d } => {
        dropped.extend(d);
        break bundle;
      }
      StageOutcome::FallThrough { dropped: d } => {
        dropped.extend(d);
        match stage.next() {
          Some(next) => {
            info!(from = %stage, to = %next, "Extraction stage found nothing, falling through");
            stage = next;
          }
          None => break GenerationBundle::new(),
        }
      }
    }
  };

  if stage == Stage::Placeholder {
    warn!(
      response_len = text.len(),
      preview = truncate_chars(text.trim(), 200),
      "No code could be extracted from response"
    );
  }

  let main_synthesized = ensure_main_entry(&mut bundle, &settings.app_title);
  debug!(
    stage = %stage,
    artifacts = bundle.artifact_count(),
    dropped = dropped.len(),
    main_synthesized,
    "Built generation bundle"
  );

  PipelineOutput {
    bundle,
    stage,
    dropped,
    main_synthesized,
  }
}
