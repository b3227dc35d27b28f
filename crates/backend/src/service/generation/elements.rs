use extract::{parse_element_array, text::truncate_chars, to_element};
use forge_core::StoredElement;
use llm::{GenerationOptions, ImageInput, describe_elements};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::GenerationService;
use crate::service::util::ServiceError;

/// An array entry that did not make it into the store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedElement {
  /// Position in the model's array
  pub index: usize,
  pub reason: String,
}

/// Outcome of an element extraction request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ElementBatch {
  /// Records as returned by the figure store, in array order
  pub created: Vec<StoredElement>,
  pub skipped: Vec<SkippedElement>,
}

impl ElementBatch {
  /// Record an entry that failed to convert or persist
  fn skip(&mut self, index: usize, reason: String) {
    let failure = ServiceError::PartialPersistenceFailure {
      index,
      reason: reason.clone(),
    };
    warn!(error = %failure, "Skipping element");
    self.skipped.push(SkippedElement { index, reason });
  }
}

impl GenerationService {
  /// Describe an image as UI elements and persist each one to `view_id`.
  ///
  /// A response that is not a JSON array fails the request. Individual
  /// elements that fail to convert or persist are skipped and reported in
  /// the batch.
  pub async fn extract_elements(
    &self,
    image: &ImageInput,
    view_id: &str,
    options: &GenerationOptions,
  ) -> Result<ElementBatch, ServiceError> {
    let figures = self.figures()?;
    if !self.provider.is_available() {
      return Err(ServiceError::DependencyUnavailable("llm provider"));
    }

    let response = describe_elements(self.provider.as_ref(), image, options, &self.request_settings()).await?;
    let items = parse_element_array(&response.text).map_err(|e| {
      warn!(preview = truncate_chars(&response.text, 200), "Element response is not a JSON array");
      ServiceError::MalformedUpstreamJson(e.to_string())
    })?;
    debug!(items = items.len(), view_id, "Persisting extracted elements");

    let mut batch = ElementBatch::default();
    for (index, item) in items.iter().enumerate() {
      let element = match to_element(item) {
        Ok(element) => element,
        Err(e) => {
          batch.skip(index, e.to_string());
          continue;
        }
      };

      match figures.create_element(view_id, element).await {
        Ok(created) => batch.created.push(created),
        Err(e) => batch.skip(index, e.to_string()),
      }
    }

    info!(
      view_id,
      created = batch.created.len(),
      skipped = batch.skipped.len(),
      "Element extraction completed"
    );
    Ok(batch)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_skip_keeps_index_and_reason() {
    let mut batch = ElementBatch::default();
    batch.skip(4, "unknown element type: triangle".to_string());
    batch.skip(7, "store offline".to_string());

    assert_eq!(
      batch.skipped,
      vec![
        SkippedElement {
          index: 4,
          reason: "unknown element type: triangle".to_string(),
        },
        SkippedElement {
          index: 7,
          reason: "store offline".to_string(),
        },
      ]
    );
    assert!(batch.created.is_empty());
  }
}
