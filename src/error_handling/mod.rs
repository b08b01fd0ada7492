//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (`QueryError`, `InitializationError`)
//! - Processing statistics tracking (errors and info metrics)
//!
//! Nothing here is fatal to a probe run: query failures degrade to empty
//! results for the affected record type and are only counted and logged.

mod stats;
mod types;

// Re-export public API
pub use stats::{print_error_statistics, ProcessingStats};
pub use types::{ErrorType, InfoType, InitializationError, QueryError};
