use serde::{Deserialize, Serialize};

/// A view (screen design) owned by the external view service.
///
/// Only `id`, `name` and the element list are read; elements are opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDescriptor {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub project_id: String,
  #[serde(default)]
  pub elements: Vec<serde_json::Value>,
}

impl ViewDescriptor {
  pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      project_id: String::new(),
      elements: Vec::new(),
    }
  }

  pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
    self.project_id = project_id.into();
    self
  }
}
