//! Image preparation: normalize uploaded images into a bare base64 payload.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::{LlmError, Result};

/// An uploaded image in one of the shapes callers hand us
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
  /// Raw image bytes
  Binary(Vec<u8>),
  /// A bare base64 payload or a `data:image/...;base64,...` URI
  Encoded(String),
}

impl ImageInput {
  /// Interpret a loosely typed upload payload.
  ///
  /// Accepts a string, an array of byte values, or a serialized buffer
  /// object (`{"type": "Buffer", "data": [...]}`). Anything else is rejected.
  pub fn from_json(value: &Value) -> Result<Self> {
    match value {
      Value::String(s) => Ok(ImageInput::Encoded(s.clone())),
      Value::Array(items) => bytes_from_array(items).map(ImageInput::Binary),
      Value::Object(map) => match map.get("data") {
        Some(Value::Array(items)) => bytes_from_array(items).map(ImageInput::Binary),
        _ => Err(LlmError::UnsupportedImageFormat("object without a byte array".into())),
      },
      Value::Null => Err(LlmError::UnsupportedImageFormat("no image provided".into())),
      other => Err(LlmError::UnsupportedImageFormat(format!("unexpected {}", json_kind(other)))),
    }
  }
}

impl From<Vec<u8>> for ImageInput {
  fn from(bytes: Vec<u8>) -> Self {
    ImageInput::Binary(bytes)
  }
}

impl From<String> for ImageInput {
  fn from(encoded: String) -> Self {
    ImageInput::Encoded(encoded)
  }
}

impl From<&str> for ImageInput {
  fn from(encoded: &str) -> Self {
    ImageInput::Encoded(encoded.to_string())
  }
}

/// Produce the bare base64 string embedded in API requests.
///
/// Data URIs lose everything up to and including the first comma; other
/// strings pass through unchanged; bytes are base64-encoded.
pub fn prepare_image(input: &ImageInput) -> Result<String> {
  match input {
    ImageInput::Binary(bytes) => {
      if bytes.is_empty() {
        return Err(LlmError::UnsupportedImageFormat("empty image data".into()));
      }
      Ok(STANDARD.encode(bytes))
    }
    ImageInput::Encoded(s) => {
      if s.trim().is_empty() {
        return Err(LlmError::UnsupportedImageFormat("empty image string".into()));
      }
      if s.starts_with("data:") {
        return match s.split_once(',') {
          Some((_, payload)) => Ok(payload.to_string()),
          None => Err(LlmError::UnsupportedImageFormat("data URI without payload".into())),
        };
      }
      Ok(s.clone())
    }
  }
}

fn bytes_from_array(items: &[Value]) -> Result<Vec<u8>> {
  items
    .iter()
    .map(|v| {
      v.as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| LlmError::UnsupportedImageFormat("byte array contains non-byte values".into()))
    })
    .collect()
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_data_uri_prefix_stripped() {
    let input = ImageInput::from("data:image/png;base64,QUJD");
    assert_eq!(prepare_image(&input).unwrap(), "QUJD");
  }

  #[test]
  fn test_data_uri_splits_at_first_comma() {
    let input = ImageInput::from("data:image/png;base64,QU,JD");
    assert_eq!(prepare_image(&input).unwrap(), "QU,JD");
  }

  #[test]
  fn test_bare_base64_passes_through() {
    let input = ImageInput::from("iVBORw0KGgo=");
    assert_eq!(prepare_image(&input).unwrap(), "iVBORw0KGgo=");
  }

  #[test]
  fn test_binary_is_encoded() {
    let input = ImageInput::from(b"ABC".to_vec());
    assert_eq!(prepare_image(&input).unwrap(), "QUJD");
  }

  #[test]
  fn test_rejects_empty_and_malformed() {
    assert!(matches!(
      prepare_image(&ImageInput::Binary(Vec::new())),
      Err(LlmError::UnsupportedImageFormat(_))
    ));
    assert!(matches!(
      prepare_image(&ImageInput::from("  ")),
      Err(LlmError::UnsupportedImageFormat(_))
    ));
    assert!(matches!(
      prepare_image(&ImageInput::from("data:image/png;base64")),
      Err(LlmError::UnsupportedImageFormat(_))
    ));
  }

  #[test]
  fn test_from_json_shapes() {
    assert_eq!(
      ImageInput::from_json(&json!("QUJD")).unwrap(),
      ImageInput::Encoded("QUJD".into())
    );
    assert_eq!(
      ImageInput::from_json(&json!([65, 66, 67])).unwrap(),
      ImageInput::Binary(b"ABC".to_vec())
    );
    assert_eq!(
      ImageInput::from_json(&json!({"type": "Buffer", "data": [65, 66, 67]})).unwrap(),
      ImageInput::Binary(b"ABC".to_vec())
    );
  }

  #[test]
  fn test_from_json_rejects_other_shapes() {
    for value in [json!(null), json!(42), json!(true), json!({"path": "x.png"}), json!([1, 300])] {
      assert!(
        matches!(ImageInput::from_json(&value), Err(LlmError::UnsupportedImageFormat(_))),
        "expected rejection for {}",
        value
      );
    }
  }
}
