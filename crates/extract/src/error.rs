use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
  #[error("Response is not valid JSON: {0}")]
  MalformedJson(String),

  #[error("Response JSON is not an array: {0}")]
  NotAnArray(String),

  #[error("Invalid element: {0}")]
  InvalidElement(String),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
