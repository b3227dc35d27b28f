//! Error taxonomy for service operations.
//!
//! Extraction problems never show up here: the pipeline always degrades to
//! a looser stage or a placeholder. Only unrecoverable conditions are
//! surfaced to the caller.

use llm::LlmError;

use crate::store::StoreError;

/// Message shown to users alongside the raw error text
pub const GENERIC_FAILURE_MESSAGE: &str = "Generation failed";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
  /// The uploaded image is not in a shape we can encode.
  #[error("Unsupported image format: {0}")]
  UnsupportedImageFormat(String),
  /// The model returned no content.
  #[error("The LLM returned an empty response")]
  UpstreamEmptyResponse,
  /// Expected a JSON array of UI elements.
  #[error("Malformed element JSON from the LLM: {0}")]
  MalformedUpstreamJson(String),
  /// A required collaborator was not supplied.
  #[error("Dependency unavailable: {0}")]
  DependencyUnavailable(&'static str),
  /// One element failed to convert or persist. Logged and skipped by batch operations.
  #[error("Element {index} was not persisted: {reason}")]
  PartialPersistenceFailure { index: usize, reason: String },
  #[error("Error using the LLM service: {0}")]
  Llm(LlmError),
  /// A collaborator call failed.
  #[error("Store error: {0}")]
  Store(String),
}

impl ServiceError {
  /// Generic failure message plus the raw error text
  pub fn user_message(&self) -> String {
    format!("{}: {}", GENERIC_FAILURE_MESSAGE, self)
  }
}

impl From<LlmError> for ServiceError {
  fn from(e: LlmError) -> Self {
    match e {
      LlmError::EmptyResponse => Self::UpstreamEmptyResponse,
      LlmError::UnsupportedImageFormat(reason) => Self::UnsupportedImageFormat(reason),
      other => Self::Llm(other),
    }
  }
}

impl From<StoreError> for ServiceError {
  fn from(e: StoreError) -> Self {
    Self::Store(e.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_llm_errors_map_onto_taxonomy() {
    assert!(matches!(
      ServiceError::from(LlmError::EmptyResponse),
      ServiceError::UpstreamEmptyResponse
    ));
    assert!(matches!(
      ServiceError::from(LlmError::UnsupportedImageFormat("null".into())),
      ServiceError::UnsupportedImageFormat(r) if r == "null"
    ));
    assert!(matches!(
      ServiceError::from(LlmError::Api {
        status: 500,
        body: "boom".into()
      }),
      ServiceError::Llm(_)
    ));
  }

  #[test]
  fn test_user_message() {
    let err = ServiceError::DependencyUnavailable("view store");
    assert_eq!(err.user_message(), "Generation failed: Dependency unavailable: view store");
  }
}
