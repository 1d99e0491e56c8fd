//! Shared types for the Relevo workforce platform
//!
//! Domain models, error codes and response structures used by the
//! server crate and by API clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
