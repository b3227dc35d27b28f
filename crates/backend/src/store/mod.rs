//! View and figure collaborators.
//!
//! Views and their elements are owned by an external persistence layer. The
//! service only needs three capabilities from it, expressed as two traits so
//! callers can hand in whatever backs them.

mod json_file;
mod memory;

use async_trait::async_trait;
use forge_core::{StoredElement, UiElement, ViewDescriptor};
use serde_json::Value;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

/// Errors from a collaborator
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("{item_type} not found: {id}")]
  NotFound { item_type: &'static str, id: String },
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
  #[error("Rejected: {0}")]
  Rejected(String),
}

impl StoreError {
  pub fn view_not_found(id: impl Into<String>) -> Self {
    Self::NotFound {
      item_type: "View",
      id: id.into(),
    }
  }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Read access to a project's views
#[async_trait]
pub trait ViewStore: Send + Sync {
  async fn find_views_by_project(&self, project_id: &str) -> StoreResult<Vec<ViewDescriptor>>;
}

/// Element storage for a view
#[async_trait]
pub trait FigureStore: Send + Sync {
  /// Raw element records; the service never looks past their count
  async fn find_elements_by_view(&self, view_id: &str) -> StoreResult<Vec<Value>>;

  /// Persist one element and return it with its assigned id
  async fn create_element(&self, view_id: &str, element: UiElement) -> StoreResult<StoredElement>;
}
