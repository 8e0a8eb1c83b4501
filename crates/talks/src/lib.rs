//! The shared library for talks, a conference session catalog service.
//!
//! This library holds the pieces both the backend and its clients need: the
//! session data model, typed identifiers, the JSON wire codec, error types and
//! logging setup.

pub mod codec;
pub mod data;
pub mod errors;
pub mod id;
pub mod log;

pub use serde;
pub use serde_json;
pub use tracing;
