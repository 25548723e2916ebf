//! FILENAME: table-engine/src/error.rs

use thiserror::Error;

/// Errors surfaced when a table is configured.
///
/// Everything past configuration degrades to a safe default instead of
/// erroring; an out-of-range page, for example, comes back empty rather
/// than failing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("invalid page size: {0} (must be at least 1)")]
    InvalidPageSize(usize),
}
