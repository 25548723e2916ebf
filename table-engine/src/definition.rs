//! FILENAME: table-engine/src/definition.rs
//! Table Definition - The configuration half of the engine's input.
//!
//! This module contains all the types needed to DESCRIBE a table:
//! - Which columns to display (or that they should be derived from the data)
//! - Which columns participate in search and sort
//! - Pagination and selection settings, plus interaction defaults
//!
//! These structures are serializable snapshots of caller intent; the one
//! runtime-only piece is the optional cell renderer capability, which is
//! skipped during (de)serialization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::ConfigurationError;
use crate::row::{RowKey, RowValue};

// ============================================================================
// CELL RENDERER CAPABILITY
// ============================================================================

/// Per-column cell renderer supplied by the presentation layer.
/// When absent, the raw value's display string is shown as-is.
pub type CellRenderer = Arc<dyn Fn(&RowValue) -> String + Send + Sync>;

// ============================================================================
// COLUMN POLICY
// ============================================================================

/// Global or per-column enablement of the search / sort behaviors.
///
/// `All(bool)` applies uniformly to every resolved column. `Only(ids)`
/// enables just the named columns; ids that match no resolved column are
/// silently inert. Note that any `Only` list - even an empty one - engages
/// the feature itself: `Only(vec![])` turns search on with zero searchable
/// columns, so no row can match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnPolicy {
    All(bool),
    Only(Vec<String>),
}

impl ColumnPolicy {
    /// Tests a column id against the policy.
    pub fn allows(&self, column_id: &str) -> bool {
        match self {
            ColumnPolicy::All(enabled) => *enabled,
            ColumnPolicy::Only(ids) => ids.iter().any(|id| id == column_id),
        }
    }

    /// Whether the feature governed by this policy is on at all.
    pub fn engaged(&self) -> bool {
        match self {
            ColumnPolicy::All(enabled) => *enabled,
            ColumnPolicy::Only(_) => true,
        }
    }
}

impl From<bool> for ColumnPolicy {
    fn from(enabled: bool) -> Self {
        ColumnPolicy::All(enabled)
    }
}

impl From<Vec<String>> for ColumnPolicy {
    fn from(ids: Vec<String>) -> Self {
        ColumnPolicy::Only(ids)
    }
}

impl From<Vec<&str>> for ColumnPolicy {
    fn from(ids: Vec<&str>) -> Self {
        ColumnPolicy::Only(ids.into_iter().map(String::from).collect())
    }
}

// ============================================================================
// COLUMN SPEC
// ============================================================================

/// An explicitly configured display column.
///
/// A bare field name converts into a spec that uses the name for both the
/// id and the header text. Malformed entries degrade: a missing display
/// name falls back to the id at resolution time.
#[derive(Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Field name this column projects.
    pub id: String,

    /// Header text (defaults to the id).
    pub display_name: Option<String>,

    /// Optional cell renderer capability from the presentation layer.
    #[serde(skip)]
    pub renderer: Option<CellRenderer>,
}

impl ColumnSpec {
    pub fn new(id: impl Into<String>) -> Self {
        ColumnSpec {
            id: id.into(),
            display_name: None,
            renderer: None,
        }
    }

    /// Sets the header text.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the cell renderer.
    pub fn renderer(
        mut self,
        renderer: impl Fn(&RowValue) -> String + Send + Sync + 'static,
    ) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }
}

impl From<&str> for ColumnSpec {
    fn from(id: &str) -> Self {
        ColumnSpec::new(id)
    }
}

impl From<String> for ColumnSpec {
    fn from(id: String) -> Self {
        ColumnSpec::new(id)
    }
}

impl fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("renderer", &self.renderer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

// ============================================================================
// TABLE DEFINITION
// ============================================================================

/// The complete configuration of a table instance.
/// Interaction defaults (sort field, direction, initial selection) seed the
/// interaction state once; everything else is consulted on every evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Explicit display columns. `None` derives one column per distinct
    /// field name observed across all rows, in first-seen order.
    pub columns: Option<Vec<ColumnSpec>>,

    /// Which columns participate in free-text search.
    pub searchable: ColumnPolicy,

    /// Which columns respond to header-click sorting.
    pub sortable: ColumnPolicy,

    /// Whether the row set is sliced into pages.
    pub pagination: bool,

    /// Rows per page. Must be at least 1; validated up front.
    pub page_size: usize,

    /// Placeholder text for the search field.
    pub search_placeholder: String,

    /// Whether row selection is requested. Selection is additionally gated
    /// on the key field being present and unique across the displayed page.
    pub selection: bool,

    /// When false, clicking an unselected row replaces the selection
    /// instead of adding to it.
    pub select_multiple: bool,

    /// Field whose value identifies a row for selection purposes.
    pub value_field: Option<String>,

    /// Initial sort column.
    pub sort_field: Option<String>,

    /// Initial sort direction.
    pub sort_ascending: bool,

    /// Initially selected row keys.
    pub selected_rows: Vec<RowKey>,
}

impl Default for TableDefinition {
    fn default() -> Self {
        TableDefinition {
            columns: None,
            searchable: ColumnPolicy::All(false),
            sortable: ColumnPolicy::All(true),
            pagination: false,
            page_size: 10,
            search_placeholder: "Search items...".to_string(),
            selection: true,
            select_multiple: true,
            value_field: None,
            sort_field: None,
            sort_ascending: true,
            selected_rows: Vec::new(),
        }
    }
}

impl TableDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the configuration for the one condition worth failing fast on.
    /// A zero page size would produce infinite or zero-size pages, which is
    /// a worse failure mode than rejecting the configuration.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.page_size == 0 {
            return Err(ConfigurationError::InvalidPageSize(self.page_size));
        }
        Ok(())
    }
}
