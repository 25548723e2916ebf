//! FILENAME: table-engine/src/state.rs
//! Interaction State - The user-driven half of the engine's input.
//!
//! The interaction state is the mutable counterpart to the immutable raw
//! data: search term, sort choice, committed page index, and the selection
//! set. It is created once per table instance, owned by a single
//! `TableEngine`, and changed only through the event transitions; every
//! change triggers a full pipeline re-evaluation.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::definition::TableDefinition;
use crate::row::RowKey;

/// The user-driven configuration of one table instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionState {
    /// The committed page index. `None` means "use `prev_page_index`",
    /// which distinguishes a table that has never paginated (or whose page
    /// field was cleared mid-edit) from one explicitly on page 0. Signed so
    /// a nonsense page-number input flows through to the paginator's
    /// empty-page fallback instead of wrapping.
    pub page_index: Option<i64>,

    /// The last explicitly committed page index.
    pub prev_page_index: i64,

    /// Free-text search term.
    pub search_value: String,

    /// Active sort column, if any.
    pub sort_field: Option<String>,

    /// Sort direction. Also consulted when `sort_field` is `None`: a false
    /// value reverses the untouched input order.
    pub sort_ascending: bool,

    /// Selected row identities.
    pub selected_rows: FxHashSet<RowKey>,
}

impl InteractionState {
    /// Seeds the initial state from the definition's interaction defaults.
    pub fn from_definition(definition: &TableDefinition) -> Self {
        InteractionState {
            page_index: None,
            prev_page_index: 0,
            search_value: String::new(),
            sort_field: definition.sort_field.clone(),
            sort_ascending: definition.sort_ascending,
            selected_rows: definition.selected_rows.iter().cloned().collect(),
        }
    }

    /// The page index used for display and paging: the committed index when
    /// one is set, else the last committed one.
    pub fn effective_page_index(&self) -> i64 {
        self.page_index.unwrap_or(self.prev_page_index)
    }

    /// Commits a page index, remembering it as the fallback for later
    /// `None` states.
    pub fn commit_page_index(&mut self, index: i64) {
        self.page_index = Some(index);
        self.prev_page_index = index;
    }

    /// Drops the committed index (page field cleared mid-edit) while
    /// keeping the fallback.
    pub fn clear_page_index(&mut self) {
        self.page_index = None;
    }
}
