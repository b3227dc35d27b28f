//! Turn free-form model output into categorized Flutter artifacts
//!
//! Everything here is pure and synchronous: no network, no storage.

pub mod blocks;
pub mod classifier;
pub mod elements;
pub mod entry;
mod error;
pub mod fallback;
pub mod fence;
pub mod navigation;
pub mod pipeline;
pub mod signature;
pub mod text;

pub use blocks::extract_code_blocks;
pub use classifier::{Classification, Target, classify, classify_blocks};
pub use elements::{parse_element_array, to_element};
pub use entry::{ensure_main_entry, synthesize_main_entry};
pub use error::{ExtractError, Result};
pub use fallback::{extract_by_class_signatures, placeholder_widget};
pub use navigation::{build_routes, select_initial, synthesize_navigation};
pub use pipeline::{PipelineOutput, PipelineSettings, Stage, build_bundle};
