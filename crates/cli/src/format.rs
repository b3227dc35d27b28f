//! Human-readable summaries for command output

use forge_core::ArtifactKind;
use screenforge::{ElementBatch, NavigationBundle, PipelineOutput, Stage};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

/// Summarize a generation result
pub fn generation_summary(output: &PipelineOutput, out_dir: &Path, file_count: usize) -> String {
  let bundle = &output.bundle;
  let mut s = String::new();

  let _ = writeln!(s, "Generated {} files in {:?}", file_count, out_dir);
  for kind in ArtifactKind::ALL {
    let artifacts = bundle.category(kind);
    if artifacts.is_empty() {
      continue;
    }
    let names: Vec<&str> = artifacts.iter().map(|a| a.name.as_str()).collect();
    let _ = writeln!(s, "  {:<10} {}", format!("{}:", kind.as_str()), names.join(", "));
  }

  match (&bundle.main_entry, output.main_synthesized) {
    (Some(_), true) => s.push_str("  main.dart  synthesized\n"),
    (Some(_), false) => s.push_str("  main.dart  from response\n"),
    (None, _) => {}
  }

  if let Some(navigation) = &bundle.navigation {
    let _ = writeln!(s, "  routes:    {}", navigation.routes.len());
  }

  match output.stage {
    Stage::TaggedBlocks => {}
    Stage::ClassSignatures => {
      s.push_str("\nNote: response had no usable code blocks; classes were recovered by signature\n")
    }
    Stage::Placeholder => s.push_str("\nWarning: no code could be recovered; a placeholder widget was generated\n"),
  }

  if !output.dropped.is_empty() {
    let _ = writeln!(s, "\nDropped {} unclassified blocks: {}", output.dropped.len(), output.dropped.join(", "));
  }

  s
}

pub fn print_generation_summary(output: &PipelineOutput, out_dir: &Path, file_count: usize) {
  print!("{}", generation_summary(output, out_dir, file_count));
}

/// Summarize a batch of extracted elements
pub fn element_batch_summary(batch: &ElementBatch, view: &str) -> String {
  let mut s = String::new();
  let _ = writeln!(s, "Created {} elements in view {}", batch.created.len(), view);

  let mut by_kind: BTreeMap<String, usize> = BTreeMap::new();
  for stored in &batch.created {
    *by_kind.entry(stored.element.kind.to_string()).or_default() += 1;
  }
  for (kind, count) in &by_kind {
    let _ = writeln!(s, "  {:<10} {}", kind, count);
  }

  if !batch.skipped.is_empty() {
    let _ = writeln!(s, "\nSkipped {}:", batch.skipped.len());
    for skipped in &batch.skipped {
      let _ = writeln!(s, "  [{}] {}", skipped.index, skipped.reason);
    }
  }

  s
}

pub fn print_element_batch(batch: &ElementBatch, view: &str) {
  print!("{}", element_batch_summary(batch, view));
}

/// Summarize a navigation bundle as a route table
pub fn navigation_summary(navigation: &NavigationBundle, out_dir: &Path) -> String {
  let mut s = String::new();
  let _ = writeln!(
    s,
    "Generated {} routes ({} files) in {:?}",
    navigation.routes.len(),
    navigation.files.len(),
    out_dir
  );

  for route in &navigation.routes {
    let marker = if route.is_initial { "*" } else { " " };
    let _ = writeln!(
      s,
      " {} {:<24} {:<28} {} elements",
      marker, route.path, route.screen_class_name, route.element_count
    );
  }

  s
}

pub fn print_navigation_summary(navigation: &NavigationBundle, out_dir: &Path) {
  print!("{}", navigation_summary(navigation, out_dir));
}
