pub mod artifact;
pub mod config;
pub mod element;
pub mod error;
pub mod view;

pub use artifact::{
  Artifact, ArtifactKind, CodeBlock, GeneratedFile, GenerationBundle, MAIN_ENTRY_FILE, MAIN_ENTRY_NAME,
  NavigationBundle, RouteEntry, file_stem,
};
pub use config::{
  Config, DEFAULT_INITIAL_ROUTE_KEYWORDS, GenerationConfig, LlmConfig, LoggingConfig, NavigationConfig, OutputConfig,
};
pub use element::{ElementKind, StoredElement, UiElement};
pub use error::{Error, Result};
pub use view::ViewDescriptor;
