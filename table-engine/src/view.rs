//! FILENAME: table-engine/src/view.rs
//! Table View - Renderable output for the presentation layer.
//!
//! One `TableView` is the fully derived, ready-to-render snapshot produced
//! by a single pipeline evaluation: resolved columns, the current page of
//! rows, pagination bounds, sort indicators, and selection state. The
//! presentation layer renders it without further logic.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::definition::CellRenderer;
use crate::row::{Row, RowKey, RowValue};

// ============================================================================
// SORT INDICATOR
// ============================================================================

/// Sort-indicator state for a sortable column's header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortIndicator {
    /// Sortable but not the active sort column.
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

// ============================================================================
// VIEW COLUMN
// ============================================================================

/// A resolved display column: a named projection of a field across rows,
/// tagged with its search/sort participation for this evaluation.
#[derive(Clone, Serialize, Deserialize)]
pub struct ViewColumn {
    /// Field name this column projects.
    pub id: String,

    /// Header text.
    pub display_name: String,

    pub is_searchable: bool,
    pub is_sortable: bool,

    /// Indicator state; only meaningful when `is_sortable` is true.
    pub sort_indicator: SortIndicator,

    /// Optional cell renderer capability.
    #[serde(skip)]
    pub renderer: Option<CellRenderer>,
}

impl ViewColumn {
    /// Renders one cell of this column for the given row. The renderer
    /// capability is applied when present; otherwise the raw value's
    /// display string is returned.
    pub fn render_cell(&self, row: &Row) -> String {
        let value = row.get(&self.id).cloned().unwrap_or(RowValue::Empty);
        match &self.renderer {
            Some(render) => render(&value),
            None => value.display_value(),
        }
    }
}

impl fmt::Debug for ViewColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewColumn")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("is_searchable", &self.is_searchable)
            .field("is_sortable", &self.is_sortable)
            .field("sort_indicator", &self.sort_indicator)
            .field("renderer", &self.renderer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

// ============================================================================
// MAIN VIEW STRUCT
// ============================================================================

/// The complete rendered view of a table for one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableView {
    /// Resolved display columns, in order.
    pub columns: Vec<ViewColumn>,

    /// The current page of rows (the whole result set when pagination is
    /// off).
    pub rows: Vec<Row>,

    /// How many rows survived the search filter, before pagination.
    pub filtered_count: usize,

    /// Upper page bound: ceil(filtered / page_size) - 1, minimum 0.
    pub max_page_index: i64,

    /// The page index in effect for this evaluation. Can sit outside
    /// [0, max_page_index] after a stale commit; the page is then empty.
    pub effective_page_index: i64,

    pub pagination: bool,
    pub page_size: usize,

    pub search_enabled: bool,
    pub search_value: String,
    pub search_placeholder: String,

    pub sort_enabled: bool,
    pub sort_field: Option<String>,
    pub sort_ascending: bool,

    /// Whether selection is usable for this view: requested, key field
    /// configured, and the key present and unique on every displayed row.
    pub selection_enabled: bool,

    /// Field whose value identifies a row.
    pub value_field: Option<String>,

    /// Currently selected row keys.
    pub selected_rows: FxHashSet<RowKey>,
}

impl TableView {
    /// 1-based page number for display.
    pub fn page_number(&self) -> i64 {
        self.effective_page_index + 1
    }

    pub fn next_disabled(&self) -> bool {
        self.effective_page_index == self.max_page_index
    }

    pub fn prev_disabled(&self) -> bool {
        self.effective_page_index == 0
    }

    /// The identity of a displayed row, per the configured key field.
    pub fn row_key(&self, row: &Row) -> Option<RowKey> {
        self.value_field.as_deref().and_then(|field| row.key(field))
    }

    /// Whether a displayed row is currently selected.
    pub fn is_row_selected(&self, row: &Row) -> bool {
        match self.row_key(row) {
            Some(key) => self.selected_rows.contains(&key),
            None => false,
        }
    }
}
