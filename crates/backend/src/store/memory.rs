use std::collections::HashMap;

use async_trait::async_trait;
use forge_core::{StoredElement, UiElement, ViewDescriptor};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{FigureStore, StoreError, StoreResult, ViewStore};

#[derive(Default)]
struct Inner {
  views: Vec<ViewDescriptor>,
  elements: HashMap<String, Vec<Value>>,
}

/// Process-local collaborator, used by tests and dry runs
#[derive(Default)]
pub struct InMemoryStore {
  inner: RwLock<Inner>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Seed a store with views; inline view elements become the view's elements
  pub fn with_views(views: impl IntoIterator<Item = ViewDescriptor>) -> Self {
    let mut inner = Inner::default();
    for mut view in views {
      let elements = std::mem::take(&mut view.elements);
      inner.elements.insert(view.id.clone(), elements);
      inner.views.push(view);
    }
    Self {
      inner: RwLock::new(inner),
    }
  }

}

#[async_trait]
impl ViewStore for InMemoryStore {
  async fn find_views_by_project(&self, project_id: &str) -> StoreResult<Vec<ViewDescriptor>> {
    let inner = self.inner.read().await;
    Ok(
      inner
        .views
        .iter()
        .filter(|v| v.project_id == project_id)
        .cloned()
        .collect(),
    )
  }
}

#[async_trait]
impl FigureStore for InMemoryStore {
  async fn find_elements_by_view(&self, view_id: &str) -> StoreResult<Vec<Value>> {
    let inner = self.inner.read().await;
    inner
      .elements
      .get(view_id)
      .cloned()
      .ok_or_else(|| StoreError::view_not_found(view_id))
  }

  async fn create_element(&self, view_id: &str, element: UiElement) -> StoreResult<StoredElement> {
    let mut inner = self.inner.write().await;
    if !inner.views.iter().any(|v| v.id == view_id) {
      return Err(StoreError::view_not_found(view_id));
    }

    let stored = StoredElement {
      id: Uuid::new_v4().to_string(),
      view_id: view_id.to_string(),
      element,
    };
    let record = serde_json::to_value(&stored)?;
    inner.elements.entry(view_id.to_string()).or_default().push(record);
    Ok(stored)
  }
}
