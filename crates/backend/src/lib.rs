//! screenforge: turn UI images and descriptions into Flutter code

mod service;
pub mod store;

pub use service::{
  generation::{ElementBatch, GenerationService, SkippedElement},
  util::{GENERIC_FAILURE_MESSAGE, ServiceError},
};

pub use extract::{PipelineOutput, Stage};
pub use forge_core::{Config, GenerationBundle, NavigationBundle};
pub use llm::{GenerationOptions, ImageInput, create_provider};
