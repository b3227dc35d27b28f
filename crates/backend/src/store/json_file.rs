use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use forge_core::{StoredElement, UiElement, ViewDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{FigureStore, StoreError, StoreResult, ViewStore};

/// On-disk shape: `{ "views": [...], "elements": { "<view id>": [...] } }`
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
  #[serde(default)]
  views: Vec<ViewDescriptor>,
  #[serde(default)]
  elements: BTreeMap<String, Vec<Value>>,
}

/// Collaborator backed by a single JSON document.
///
/// Elements listed inline on a view are served until the `elements` map has
/// an entry for it. The first created element seeds that entry with the
/// inline elements, so nothing is hidden once the map takes over. The file is
/// rewritten on every create; a failed write leaves the document unchanged.
pub struct JsonFileStore {
  path: PathBuf,
  doc: Mutex<StoreDocument>,
}

impl JsonFileStore {
  /// Load the document at `path`. A missing file starts an empty store.
  pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
    let path = path.into();
    let doc = match tokio::fs::read_to_string(&path).await {
      Ok(raw) => serde_json::from_str(&raw)?,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreDocument::default(),
      Err(e) => return Err(e.into()),
    };
    debug!(path = %path.display(), views = doc.views.len(), "Opened JSON store");
    Ok(Self {
      path,
      doc: Mutex::new(doc),
    })
  }

  async fn persist(&self, doc: &StoreDocument) -> StoreResult<()> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = self.path.with_extension("json.tmp");
    tokio::fs::write(&tmp, serde_json::to_vec_pretty(doc)?).await?;
    tokio::fs::rename(&tmp, &self.path).await?;
    Ok(())
  }
}

#[async_trait]
impl ViewStore for JsonFileStore {
  async fn find_views_by_project(&self, project_id: &str) -> StoreResult<Vec<ViewDescriptor>> {
    let doc = self.doc.lock().await;
    Ok(doc.views.iter().filter(|v| v.project_id == project_id).cloned().collect())
  }
}

#[async_trait]
impl FigureStore for JsonFileStore {
  async fn find_elements_by_view(&self, view_id: &str) -> StoreResult<Vec<Value>> {
    let doc = self.doc.lock().await;
    if let Some(elements) = doc.elements.get(view_id) {
      return Ok(elements.clone());
    }
    doc
      .views
      .iter()
      .find(|v| v.id == view_id)
      .map(|v| v.elements.clone())
      .ok_or_else(|| StoreError::view_not_found(view_id))
  }

  async fn create_element(&self, view_id: &str, element: UiElement) -> StoreResult<StoredElement> {
    let mut doc = self.doc.lock().await;
    let Some(view) = doc.views.iter().find(|v| v.id == view_id) else {
      return Err(StoreError::view_not_found(view_id));
    };
    let inline = view.elements.clone();

    let stored = StoredElement {
      id: Uuid::new_v4().to_string(),
      view_id: view_id.to_string(),
      element,
    };
    let record = serde_json::to_value(&stored)?;

    let previous = doc.elements.get(view_id).cloned();
    let mut records = previous.clone().unwrap_or(inline);
    records.push(record);
    doc.elements.insert(view_id.to_string(), records);

    if let Err(e) = self.persist(&doc).await {
      match previous {
        Some(records) => doc.elements.insert(view_id.to_string(), records),
        None => doc.elements.remove(view_id),
      };
      warn!(view_id = %view_id, error = %e, "Failed to write store, element discarded");
      return Err(e);
    }
    Ok(stored)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use forge_core::ElementKind;
  use serde_json::json;
  use tempfile::TempDir;

  const DOC: &str = r#"{
  "views": [
    {"id": "v1", "name": "Home", "projectId": "p1", "elements": [{"type": "text"}, {"type": "line"}]},
    {"id": "v2", "name": "Login", "projectId": "p1"}
  ]
}"#;

  #[tokio::test]
  async fn test_reads_inline_elements() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, DOC).unwrap();

    let store = JsonFileStore::open(&path).await.unwrap();
    assert_eq!(store.find_views_by_project("p1").await.unwrap().len(), 2);
    assert_eq!(store.find_elements_by_view("v1").await.unwrap().len(), 2);
    assert!(store.find_elements_by_view("v2").await.unwrap().is_empty());
    assert!(store.find_elements_by_view("v9").await.is_err());
  }

  #[tokio::test]
  async fn test_create_keeps_inline_elements() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, DOC).unwrap();

    let store = JsonFileStore::open(&path).await.unwrap();
    let mut circle = UiElement::new(ElementKind::Circle, 5.0, 5.0);
    circle.radius = Some(3.0);
    let stored = store.create_element("v1", circle).await.unwrap();

    let records = store.find_elements_by_view("v1").await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["type"], "text");
    assert_eq!(records[1]["type"], "line");
    assert_eq!(records[2]["id"], json!(stored.id));

    let reopened = JsonFileStore::open(&path).await.unwrap();
    assert_eq!(reopened.find_elements_by_view("v1").await.unwrap().len(), 3);
  }

  #[tokio::test]
  async fn test_failed_write_discards_element() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, DOC).unwrap();
    let store = JsonFileStore::open(&path).await.unwrap();

    // a directory in place of the file makes the final rename fail
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();

    let result = store.create_element("v2", UiElement::new(ElementKind::Line, 0.0, 0.0)).await;
    assert!(matches!(result, Err(StoreError::Io(_))));
    assert!(store.find_elements_by_view("v2").await.unwrap().is_empty());
    assert_eq!(store.find_elements_by_view("v1").await.unwrap().len(), 2);
  }

  #[tokio::test]
  async fn test_created_elements_are_written_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, DOC).unwrap();

    let store = JsonFileStore::open(&path).await.unwrap();
    let mut element = UiElement::new(ElementKind::Text, 1.0, 2.0);
    element.text = Some("Hello".to_string());
    let stored = store.create_element("v2", element).await.unwrap();

    let reopened = JsonFileStore::open(&path).await.unwrap();
    let records = reopened.find_elements_by_view("v2").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], json!(stored.id));
    assert_eq!(records[0]["viewId"], "v2");
    assert_eq!(records[0]["text"], "Hello");
  }

  #[tokio::test]
  async fn test_missing_file_is_empty_store() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::open(dir.path().join("none.json")).await.unwrap();
    assert!(store.find_views_by_project("p1").await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_corrupt_file_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
      JsonFileStore::open(&path).await,
      Err(StoreError::Serialization(_))
    ));
  }
}
