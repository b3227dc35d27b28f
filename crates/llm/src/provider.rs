//! Provider seam between request building and the HTTP backends

use async_trait::async_trait;
use dyn_clone::DynClone;

use crate::{InferenceRequest, InferenceResponse, LlmError};

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LlmError>;

/// A multimodal completion backend.
///
/// A request carries an instruction, an optional system prompt and at most
/// one image as a bare base64 PNG payload in [`InferenceRequest::image`].
/// Providers that cannot send images must fail rather than drop the image.
///
/// The reply is the completion text only. A completion with no text is
/// [`LlmError::EmptyResponse`], never an empty `Ok`, so callers can tell a
/// silent model from one that answered with nothing usable.
///
/// ```
/// use llm::{InferenceRequest, InferenceResponse, LlmError, LlmProvider, Result};
///
/// #[derive(Clone)]
/// struct Canned(String);
///
/// #[async_trait::async_trait]
/// impl LlmProvider for Canned {
///   fn name(&self) -> &str {
///     "canned"
///   }
///
///   fn is_available(&self) -> bool {
///     true
///   }
///
///   async fn infer(&self, _request: InferenceRequest) -> Result<InferenceResponse> {
///     if self.0.trim().is_empty() {
///       return Err(LlmError::EmptyResponse);
///     }
///     Ok(InferenceResponse {
///       text: self.0.clone(),
///       ..Default::default()
///     })
///   }
/// }
/// ```
#[async_trait]
pub trait LlmProvider: Send + Sync + DynClone {
  /// The name of this provider (for logging/identification)
  fn name(&self) -> &str;

  /// Check if this provider is available/configured
  ///
  /// Returns `true` if the provider can be used for inference.
  fn is_available(&self) -> bool;

  /// Perform inference with the given request
  ///
  /// Implementations must return `LlmError::EmptyResponse` when the
  /// completion carries no text. Failures are never retried.
  async fn infer(&self, request: InferenceRequest) -> Result<InferenceResponse>;
}

dyn_clone::clone_trait_object!(LlmProvider);

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Clone)]
  struct Echo;

  #[async_trait]
  impl LlmProvider for Echo {
    fn name(&self) -> &str {
      "echo"
    }

    fn is_available(&self) -> bool {
      true
    }

    async fn infer(&self, request: InferenceRequest) -> Result<InferenceResponse> {
      match request.image {
        Some(image) => Ok(InferenceResponse {
          text: format!("{}:{}", request.prompt, image),
          ..Default::default()
        }),
        None => Err(LlmError::EmptyResponse),
      }
    }
  }

  #[tokio::test]
  async fn test_boxed_provider_clones_and_sees_image() {
    let provider: Box<dyn LlmProvider> = Box::new(Echo);
    let cloned = provider.clone();
    assert_eq!(cloned.name(), "echo");

    let mut request = InferenceRequest::new("describe", "model");
    request.image = Some("QUJD".to_string());
    assert_eq!(cloned.infer(request).await.unwrap().text, "describe:QUJD");

    let blank = InferenceRequest::new("describe", "model");
    assert!(matches!(provider.infer(blank).await, Err(LlmError::EmptyResponse)));
  }
}
