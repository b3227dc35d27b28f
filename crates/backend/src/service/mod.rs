//! Business logic services.
//!
//! ## Available Services
//!
//! - [`generation`] - Code generation, element extraction and navigation synthesis
//! - [`util`] - Shared error type

pub mod generation;
pub mod util;
