//! Shared helpers for service integration tests

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use forge_core::{Config, ElementKind, StoredElement, UiElement, ViewDescriptor};
use llm::{InferenceRequest, InferenceResponse, LlmError, LlmProvider};
use screenforge::GenerationService;
use screenforge::store::{FigureStore, InMemoryStore, StoreError, StoreResult, ViewStore};
use serde_json::Value;

/// Provider that replays canned completions and records every request
#[derive(Clone, Default)]
pub struct ScriptedProvider {
  responses: Arc<Mutex<VecDeque<Result<String, String>>>>,
  pub requests: Arc<Mutex<Vec<InferenceRequest>>>,
}

impl ScriptedProvider {
  pub fn replying(texts: &[&str]) -> Self {
    let provider = Self::default();
    {
      let mut queue = provider.responses.lock().unwrap();
      queue.extend(texts.iter().map(|t| Ok(t.to_string())));
    }
    provider
  }

  /// Next call fails with an API error
  pub fn failing(body: &str) -> Self {
    let provider = Self::default();
    provider.responses.lock().unwrap().push_back(Err(body.to_string()));
    provider
  }

  pub fn request_count(&self) -> usize {
    self.requests.lock().unwrap().len()
  }

  pub fn last_request(&self) -> InferenceRequest {
    self.requests.lock().unwrap().last().cloned().expect("at least one request")
  }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
  fn name(&self) -> &str {
    "scripted"
  }

  fn is_available(&self) -> bool {
    true
  }

  async fn infer(&self, request: InferenceRequest) -> llm::Result<InferenceResponse> {
    self.requests.lock().unwrap().push(request);
    let next = self.responses.lock().unwrap().pop_front();
    match next {
      Some(Ok(text)) if text.trim().is_empty() => Err(LlmError::EmptyResponse),
      Some(Ok(text)) => Ok(InferenceResponse {
        text,
        ..Default::default()
      }),
      Some(Err(body)) => Err(LlmError::Api { status: 500, body }),
      None => Err(LlmError::EmptyResponse),
    }
  }
}

/// Figure store that fails reads for some views and rejects some element kinds
pub struct FlakyFigures {
  pub inner: Arc<InMemoryStore>,
  pub failing_views: HashSet<String>,
  pub rejected_kinds: HashSet<ElementKind>,
}

impl FlakyFigures {
  pub fn new(inner: Arc<InMemoryStore>) -> Self {
    Self {
      inner,
      failing_views: HashSet::new(),
      rejected_kinds: HashSet::new(),
    }
  }
}

#[async_trait]
impl FigureStore for FlakyFigures {
  async fn find_elements_by_view(&self, view_id: &str) -> StoreResult<Vec<Value>> {
    if self.failing_views.contains(view_id) {
      return Err(StoreError::Rejected(format!("view {} is unavailable", view_id)));
    }
    self.inner.find_elements_by_view(view_id).await
  }

  async fn create_element(&self, view_id: &str, element: UiElement) -> StoreResult<StoredElement> {
    if self.rejected_kinds.contains(&element.kind) {
      return Err(StoreError::Rejected(format!("{} elements are not accepted", element.kind)));
    }
    self.inner.create_element(view_id, element).await
  }
}

/// Views for project `p1`, each seeded with `count` placeholder elements
pub fn project_views(names: &[(&str, usize)]) -> Vec<ViewDescriptor> {
  names
    .iter()
    .enumerate()
    .map(|(i, (name, count))| {
      let mut view = ViewDescriptor::new(format!("view-{}", i + 1), *name).with_project("p1");
      view.elements = (0..*count).map(|n| serde_json::json!({ "id": n })).collect();
      view
    })
    .collect()
}

/// Service with the scripted provider and no collaborators
pub fn service(provider: &ScriptedProvider) -> GenerationService {
  GenerationService::new(Arc::new(provider.clone()), Arc::new(Config::default()))
}

/// Service wired to an in-memory store for both collaborators
pub fn service_with_store(provider: &ScriptedProvider, store: Arc<InMemoryStore>) -> GenerationService {
  service(provider).with_collaborators(store.clone() as Arc<dyn ViewStore>, store as Arc<dyn FigureStore>)
}

/// A complete, well-tagged code response
pub const TAGGED_RESPONSE: &str = r#"Here is the Flutter app:

```dart
// main.dart
import 'package:flutter/material.dart';
import 'screens/login_screen.dart';

void main() => runApp(const MaterialApp(home: LoginScreen()));
```

```dart
// login_screen.dart
import 'package:flutter/material.dart';

class LoginScreen extends StatelessWidget {
  const LoginScreen({super.key});

  @override
  Widget build(BuildContext context) => const Scaffold();
}
```

```dart
// primary_button_widget.dart
class PrimaryButton extends StatelessWidget {}
```

```dart
// user_model.dart
class User {
  final String email;
  const User(this.email);
}
```

```dart
// auth_service.dart
class AuthService {}
```
"#;
