//! FILENAME: table-engine/src/lib.rs
//! Headless table view engine.
//!
//! Given an arbitrary set of row records and a declarative column/display
//! configuration, this crate derives the effective columns, filters rows by
//! a free-text search term, sorts by a chosen field and direction, slices
//! the result into pages, and tracks row selection across re-evaluations.
//! The output is a fully normalized view that a presentation layer renders
//! without further logic; visual concerns stay with the caller.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the table IS)
//! - `row`: The record model the pipeline operates on
//! - `state`: User-driven interaction state and its transitions
//! - `view`: Renderable output for the presentation layer (WHAT we display)
//! - `engine`: Calculation pipeline and the stateful orchestrator (HOW)

pub mod definition;
pub mod engine;
pub mod error;
pub mod row;
pub mod state;
pub mod view;

// Re-export commonly used types at the crate root
pub use definition::{CellRenderer, ColumnPolicy, ColumnSpec, TableDefinition};
pub use engine::{calculate_table, resolve_columns, toggle_row, TableEngine};
pub use error::ConfigurationError;
pub use row::{compare_values, OrderedFloat, Row, RowKey, RowValue};
pub use state::InteractionState;
pub use view::{SortIndicator, TableView, ViewColumn};
