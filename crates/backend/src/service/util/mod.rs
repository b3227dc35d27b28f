//! Shared utilities for the service layer.
//!
//! - `error` - Unified error type for service operations

mod error;

pub use error::{GENERIC_FAILURE_MESSAGE, ServiceError};
