//! Backend services for the session catalog.
//!
//! `sessions` holds the concurrent session store and `health` the evaluator
//! behind the orchestrator health checks.

pub mod health;
pub mod sessions;

pub use health::*;
pub use sessions::*;
