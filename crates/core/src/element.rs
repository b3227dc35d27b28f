//! Structured UI shape descriptors the LLM is asked to emit as a JSON array.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
  Rectangle,
  Circle,
  Text,
  Line,
}

impl ElementKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      ElementKind::Rectangle => "rectangle",
      ElementKind::Circle => "circle",
      ElementKind::Text => "text",
      ElementKind::Line => "line",
    }
  }
}

impl std::fmt::Display for ElementKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// A shape parsed from the LLM response. Has no identity until persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiElement {
  #[serde(rename = "type")]
  pub kind: ElementKind,

  // geometry
  #[serde(default)]
  pub x: f64,
  #[serde(default)]
  pub y: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub width: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub height: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub radius: Option<f64>,
  /// Line end point
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub x2: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub y2: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rotation: Option<f64>,

  // style
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub fill: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub stroke: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub stroke_width: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub opacity: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub text: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub font_size: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub font_family: Option<String>,
}

impl UiElement {
  pub fn new(kind: ElementKind, x: f64, y: f64) -> Self {
    Self {
      kind,
      x,
      y,
      width: None,
      height: None,
      radius: None,
      x2: None,
      y2: None,
      rotation: None,
      fill: None,
      stroke: None,
      stroke_width: None,
      opacity: None,
      text: None,
      font_size: None,
      font_family: None,
    }
  }

  /// Check that the geometry needed to draw this kind of shape is present.
  pub fn validate(&self) -> Result<()> {
    let numbers = [
      Some(self.x),
      Some(self.y),
      self.width,
      self.height,
      self.radius,
      self.x2,
      self.y2,
      self.rotation,
      self.stroke_width,
      self.opacity,
      self.font_size,
    ];
    if numbers.iter().flatten().any(|n| !n.is_finite()) {
      return Err(Error::Validation(format!("{} has a non-finite coordinate", self.kind)));
    }

    match self.kind {
      ElementKind::Rectangle => {
        if !positive(self.width) || !positive(self.height) {
          return Err(Error::Validation("rectangle needs positive width and height".into()));
        }
      }
      ElementKind::Circle => {
        if !positive(self.radius) && !positive(self.width) {
          return Err(Error::Validation("circle needs a positive radius or width".into()));
        }
      }
      ElementKind::Text => {
        if self.text.as_deref().is_none_or(|t| t.trim().is_empty()) {
          return Err(Error::Validation("text element needs non-empty text".into()));
        }
      }
      ElementKind::Line => {
        if self.x2.is_none() || self.y2.is_none() {
          return Err(Error::Validation("line needs an end point (x2, y2)".into()));
        }
      }
    }

    Ok(())
  }
}

fn positive(value: Option<f64>) -> bool {
  value.is_some_and(|v| v > 0.0)
}

/// An element as returned by the figure collaborator after persisting it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredElement {
  pub id: String,
  pub view_id: String,
  #[serde(flatten)]
  pub element: UiElement,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_rectangle() {
    let json = r##"{"type":"rectangle","x":10,"y":20,"width":100,"height":40,"fill":"#FF0000","strokeWidth":2}"##;
    let element: UiElement = serde_json::from_str(json).unwrap();

    assert_eq!(element.kind, ElementKind::Rectangle);
    assert_eq!(element.width, Some(100.0));
    assert_eq!(element.stroke_width, Some(2.0));
    assert_eq!(element.fill.as_deref(), Some("#FF0000"));
    assert!(element.validate().is_ok());
  }

  #[test]
  fn test_unknown_kind_is_rejected() {
    let json = r#"{"type":"hexagon","x":0,"y":0}"#;
    assert!(serde_json::from_str::<UiElement>(json).is_err());
  }

  #[test]
  fn test_validate_by_kind() {
    let rect = UiElement::new(ElementKind::Rectangle, 0.0, 0.0);
    assert!(rect.validate().is_err());

    let mut circle = UiElement::new(ElementKind::Circle, 5.0, 5.0);
    assert!(circle.validate().is_err());
    circle.radius = Some(3.0);
    assert!(circle.validate().is_ok());

    let mut text = UiElement::new(ElementKind::Text, 0.0, 0.0);
    text.text = Some("   ".into());
    assert!(text.validate().is_err());
    text.text = Some("Sign in".into());
    assert!(text.validate().is_ok());

    let mut line = UiElement::new(ElementKind::Line, 0.0, 0.0);
    line.x2 = Some(10.0);
    assert!(line.validate().is_err());
    line.y2 = Some(10.0);
    assert!(line.validate().is_ok());
  }

  #[test]
  fn test_stored_element_flattens() {
    let mut element = UiElement::new(ElementKind::Circle, 1.0, 2.0);
    element.radius = Some(4.0);
    let stored = StoredElement {
      id: "el-1".into(),
      view_id: "view-1".into(),
      element,
    };

    let json = serde_json::to_value(&stored).unwrap();
    assert_eq!(json["id"], "el-1");
    assert_eq!(json["viewId"], "view-1");
    assert_eq!(json["type"], "circle");
    assert_eq!(json["radius"], 4.0);
  }
}
