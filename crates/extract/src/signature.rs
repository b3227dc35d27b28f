//! Content signatures: what a block of Dart code looks like it is

use std::sync::LazyLock;

use regex::Regex;

static APP_ENTRY: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\bvoid\s+main\s*\(|\brunApp\s*\(").expect("valid app entry pattern"));

static UI_CLASS: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\bclass\s+(\w+)\s+extends\s+(?:StatelessWidget|StatefulWidget)\b").expect("valid ui class pattern")
});

static PLAIN_CLASS: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\bclass\s+(\w+)\s*\{").expect("valid plain class pattern"));

static ANY_CLASS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bclass\s+(\w+)").expect("valid class pattern"));

const SERVICE_SUFFIXES: &[&str] = &["Service", "Provider", "Repository", "Client", "Api"];

/// Role a piece of code appears to play, judged only by its text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
  AppEntry,
  Screen,
  Widget,
  Model,
  Service,
}

/// Class names that read as data access or integration code
pub fn is_service_name(class_name: &str) -> bool {
  SERVICE_SUFFIXES.iter().any(|s| class_name.ends_with(s))
}

/// Class names that read as a full page
pub fn is_screen_name(class_name: &str) -> bool {
  class_name.contains("Screen") || class_name.contains("Page")
}

/// Name of the first widget class, if any
pub fn ui_class_name(code: &str) -> Option<&str> {
  UI_CLASS.captures(code).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Name of the first class definition of any kind
pub fn first_class_name(code: &str) -> Option<&str> {
  ANY_CLASS.captures(code).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn plain_non_service_class(code: &str) -> bool {
  PLAIN_CLASS
    .captures_iter(code)
    .filter_map(|c| c.get(1))
    .any(|m| !is_service_name(m.as_str()))
}

fn service_class(code: &str) -> bool {
  ANY_CLASS
    .captures_iter(code)
    .filter_map(|c| c.get(1))
    .any(|m| is_service_name(m.as_str()))
}

/// Detect a role from the code, checking in a fixed order:
/// app entry, UI base type, plain class, service naming.
pub fn detect(code: &str) -> Option<Signature> {
  if APP_ENTRY.is_match(code) {
    return Some(Signature::AppEntry);
  }
  detect_component(code)
}

/// Same as [`detect`] without the app entry check
pub fn detect_component(code: &str) -> Option<Signature> {
  if UI_CLASS.is_match(code) {
    let screen = code.contains("Screen") || code.contains("Page");
    return Some(if screen { Signature::Screen } else { Signature::Widget });
  }
  if plain_non_service_class(code) {
    return Some(Signature::Model);
  }
  if service_class(code) {
    return Some(Signature::Service);
  }
  None
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_app_entry_wins() {
    let code = "void main() { runApp(const MyApp()); }\nclass MyApp extends StatelessWidget {}";
    assert_eq!(detect(code), Some(Signature::AppEntry));
    assert_eq!(detect_component(code), Some(Signature::Widget));
  }

  #[test]
  fn test_ui_classes() {
    assert_eq!(
      detect("class LoginScreen extends StatefulWidget {}"),
      Some(Signature::Screen)
    );
    assert_eq!(detect("class HomePage extends StatelessWidget {}"), Some(Signature::Screen));
    assert_eq!(detect("class Avatar extends StatelessWidget {}"), Some(Signature::Widget));
  }

  #[test]
  fn test_plain_class_is_model() {
    assert_eq!(
      detect("class User {\n  final String name;\n  User(this.name);\n}"),
      Some(Signature::Model)
    );
  }

  #[test]
  fn test_service_naming() {
    assert_eq!(detect("class AuthService {\n  Future<void> login() async {}\n}"), Some(Signature::Service));
    assert_eq!(detect("class UserRepository implements Repo {}"), Some(Signature::Service));
  }

  #[test]
  fn test_nothing_recognizable() {
    assert_eq!(detect("name: my_app\nversion: 1.0.0"), None);
    assert_eq!(detect("class Foo extends Bar {}"), None);
  }

  #[test]
  fn test_class_names() {
    let code = "class _Helper {}\nclass CartScreen extends StatefulWidget {}";
    assert_eq!(first_class_name(code), Some("_Helper"));
    assert_eq!(ui_class_name(code), Some("CartScreen"));
    assert!(is_service_name("WeatherApi"));
    assert!(!is_service_name("Weather"));
  }
}
