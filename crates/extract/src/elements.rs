//! Lenient parsing of element-extraction responses
//!
//! The model is asked for a bare JSON array but may wrap it in a fence,
//! add prose around it, or wrap it in an object. Each array item is
//! converted on its own so one bad shape does not sink the rest.

use forge_core::UiElement;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{ExtractError, Result};
use crate::fence::scan_fences;
use crate::text::truncate_chars;

/// Where the array was found
fn candidates(text: &str) -> Vec<&str> {
  let mut out = Vec::new();
  for fence in scan_fences(text) {
    if fence.lang.is_empty() || fence.lang.eq_ignore_ascii_case("json") {
      out.push(fence.body.trim());
    }
  }
  out.push(text.trim());
  if let (Some(start), Some(end)) = (text.find('['), text.rfind(']'))
    && start < end
  {
    out.push(&text[start..=end]);
  }
  out
}

fn into_array(value: Value) -> Option<Vec<Value>> {
  match value {
    Value::Array(items) => Some(items),
    Value::Object(mut map) => match map.remove("elements") {
      Some(Value::Array(items)) => Some(items),
      _ => None,
    },
    _ => None,
  }
}

/// Pull the element array out of a raw response
pub fn parse_element_array(text: &str) -> Result<Vec<Value>> {
  let mut parsed_non_array = false;

  for candidate in candidates(text) {
    if candidate.is_empty() {
      continue;
    }
    let Ok(value) = serde_json::from_str::<Value>(candidate) else {
      trace!(candidate_len = candidate.len(), "Candidate is not JSON");
      continue;
    };
    match into_array(value) {
      Some(items) => {
        debug!(items = items.len(), "Parsed element array");
        return Ok(items);
      }
      None => parsed_non_array = true,
    }
  }

  let preview = truncate_chars(text.trim(), 200).to_string();
  if parsed_non_array {
    Err(ExtractError::NotAnArray(preview))
  } else {
    Err(ExtractError::MalformedJson(preview))
  }
}

/// Convert one array item into a validated element
pub fn to_element(value: &Value) -> Result<UiElement> {
  let element: UiElement =
    serde_json::from_value(value.clone()).map_err(|e| ExtractError::InvalidElement(e.to_string()))?;
  element
    .validate()
    .map_err(|e| ExtractError::InvalidElement(e.to_string()))?;
  Ok(element)
}

#[cfg(test)]
mod tests {
  use super::*;
  use forge_core::ElementKind;
  use serde_json::json;

  #[test]
  fn test_bare_array() {
    let items = parse_element_array(r#"[{"type":"circle","x":1,"y":2,"radius":3}]"#).unwrap();
    assert_eq!(items.len(), 1);
  }

  #[test]
  fn test_fenced_array_with_prose() {
    let text = "Here are the shapes:\n```json\n[{\"type\":\"text\",\"x\":0,\"y\":0,\"text\":\"Hi\"}]\n```\nDone.";
    assert_eq!(parse_element_array(text).unwrap().len(), 1);
  }

  #[test]
  fn test_array_inside_prose() {
    let text = "Shapes: [{\"type\":\"line\",\"x\":0,\"y\":0,\"x2\":5,\"y2\":5}] hope that helps";
    assert_eq!(parse_element_array(text).unwrap().len(), 1);
  }

  #[test]
  fn test_wrapped_object() {
    let text = r#"{"elements": [{"type":"rectangle","x":0,"y":0,"width":1,"height":1}]}"#;
    assert_eq!(parse_element_array(text).unwrap().len(), 1);
  }

  #[test]
  fn test_empty_array() {
    assert!(parse_element_array("[]").unwrap().is_empty());
  }

  #[test]
  fn test_malformed() {
    assert!(matches!(
      parse_element_array("I see a button and a title"),
      Err(ExtractError::MalformedJson(_))
    ));
    assert!(matches!(
      parse_element_array("[{\"type\": \"circle\","),
      Err(ExtractError::MalformedJson(_))
    ));
  }

  #[test]
  fn test_non_array_json() {
    assert!(matches!(
      parse_element_array(r#"{"type":"circle"}"#),
      Err(ExtractError::NotAnArray(_))
    ));
  }

  #[test]
  fn test_to_element() {
    let element = to_element(&json!({
      "type": "rectangle", "x": 10, "y": 20, "width": 100, "height": 40, "fill": "#FF0000"
    }))
    .unwrap();
    assert_eq!(element.kind, ElementKind::Rectangle);
    assert_eq!(element.width, Some(100.0));
    assert_eq!(element.fill.as_deref(), Some("#FF0000"));

    assert!(matches!(
      to_element(&json!({"type": "hexagon", "x": 0, "y": 0})),
      Err(ExtractError::InvalidElement(_))
    ));
    assert!(matches!(
      to_element(&json!({"type": "circle", "x": 0, "y": 0})),
      Err(ExtractError::InvalidElement(_))
    ));
  }
}
