//! FILENAME: table-engine/src/engine.rs
//! Table Engine - The calculation core that transforms data into a renderable view.
//!
//! This module takes a TableDefinition (configuration), the raw rows, and
//! an InteractionState and produces a TableView ready for rendering.
//!
//! Pipeline:
//! 1. Resolve the display columns (explicit specs, or the ordered union of
//!    field names across all rows)
//! 2. Filter rows by the search term across searchable columns
//! 3. Sort by the active sort column and direction
//! 4. Slice the ordered set into the effective page
//! 5. Decide whether selection is usable for the displayed rows
//!
//! The whole pipeline re-runs on every interaction-state change. That is a
//! correctness-first design: there is no caching or incremental update, and
//! every transform completes before the next event is accepted.

use log::debug;
use rustc_hash::FxHashSet;

use crate::definition::TableDefinition;
use crate::error::ConfigurationError;
use crate::row::{compare_values, Row, RowKey, RowValue};
use crate::state::InteractionState;
use crate::view::{SortIndicator, TableView, ViewColumn};

// ============================================================================
// COLUMN RESOLVER
// ============================================================================

/// Derives the ordered list of display columns.
///
/// With no explicit column list, one column is produced per distinct field
/// name observed across **all** rows (first-seen order, duplicates removed),
/// so heterogeneous row shapes still yield a complete header. Explicit specs
/// are normalized best-effort: a missing display name falls back to the id.
pub fn resolve_columns(definition: &TableDefinition, rows: &[Row]) -> Vec<ViewColumn> {
    let specs: Vec<(String, Option<String>, Option<crate::definition::CellRenderer>)> =
        match &definition.columns {
            Some(columns) => columns
                .iter()
                .map(|c| (c.id.clone(), c.display_name.clone(), c.renderer.clone()))
                .collect(),
            None => {
                let mut seen = FxHashSet::default();
                let mut ids = Vec::new();
                for row in rows {
                    for name in row.field_names() {
                        if seen.insert(name.to_string()) {
                            ids.push(name.to_string());
                        }
                    }
                }
                ids.into_iter().map(|id| (id, None, None)).collect()
            }
        };

    specs
        .into_iter()
        .map(|(id, display_name, renderer)| {
            let is_searchable = definition.searchable.allows(&id);
            let is_sortable = definition.sortable.allows(&id);
            ViewColumn {
                display_name: display_name.unwrap_or_else(|| id.clone()),
                id,
                is_searchable,
                is_sortable,
                sort_indicator: SortIndicator::Unsorted,
                renderer,
            }
        })
        .collect()
}

// ============================================================================
// SEARCH FILTER
// ============================================================================

/// Whether a row matches the (already lower-cased) search term on at least
/// one searchable column. Missing fields and `Empty` coerce to the empty
/// string: they never match a non-empty term and always match an empty one.
fn row_matches_search(columns: &[ViewColumn], needle: &str, row: &Row) -> bool {
    columns.iter().any(|column| {
        column.is_searchable
            && row
                .display_value(&column.id)
                .to_lowercase()
                .contains(needle)
    })
}

// ============================================================================
// SORTER
// ============================================================================

/// Orders the (possibly filtered) row set in place.
///
/// With no sort field, the input order is kept - except that a descending
/// direction still reverses it, an asymmetry the interaction model depends
/// on. With a sort field, rows sort stably by the field's natural ordering;
/// rows missing the field rank as `Empty`. Descending flips the comparator
/// rather than reversing afterwards, so ties keep their original relative
/// order in both directions.
fn sort_rows(rows: &mut [&Row], sort_field: Option<&str>, sort_ascending: bool) {
    let Some(field) = sort_field else {
        if !sort_ascending {
            rows.reverse();
        }
        return;
    };

    rows.sort_by(|a, b| {
        let va = a.get(field).unwrap_or(&RowValue::Empty);
        let vb = b.get(field).unwrap_or(&RowValue::Empty);
        if sort_ascending {
            compare_values(va, vb)
        } else {
            compare_values(vb, va)
        }
    });
}

// ============================================================================
// PAGINATOR
// ============================================================================

/// Upper page bound for the ordered set: ceil(count / page_size) - 1,
/// minimum 0 (an empty set still has one empty page). 0 when pagination is
/// off.
fn max_page_index(count: usize, pagination: bool, page_size: usize) -> i64 {
    if !pagination {
        return 0;
    }
    (count.div_ceil(page_size) as i64 - 1).max(0)
}

/// The chunk of rows at `page_index`, or the whole set when pagination is
/// off. Out-of-range indices - stale commits, nonsense page input - come
/// back as an empty page rather than panicking.
fn page_slice<'a>(
    rows: &[&'a Row],
    pagination: bool,
    page_size: usize,
    page_index: i64,
) -> Vec<&'a Row> {
    if !pagination {
        return rows.to_vec();
    }
    if page_index < 0 {
        return Vec::new();
    }
    let start = (page_index as usize).saturating_mul(page_size);
    if start >= rows.len() {
        return Vec::new();
    }
    let end = (start + page_size).min(rows.len());
    rows[start..end].to_vec()
}

// ============================================================================
// SELECTION TRACKER
// ============================================================================

/// Whether selection is usable for the displayed rows: it must be
/// requested, a key field must be configured, and every displayed row must
/// carry a distinct, non-empty value for it. Enablement is computed against
/// the rows actually on screen, so it flips dynamically as search, sort,
/// and paging change the visible set.
fn selection_usable(page_rows: &[&Row], value_field: Option<&str>, requested: bool) -> bool {
    if !requested {
        return false;
    }
    let Some(field) = value_field else {
        return false;
    };
    if field.is_empty() {
        return false;
    }

    let mut keys = FxHashSet::default();
    for row in page_rows {
        let Some(key) = row.key(field) else {
            return false;
        };
        if !keys.insert(key) {
            // Duplicate identity: toggling one would toggle both.
            return false;
        }
    }
    true
}

/// Copy-on-write toggle: returns a new set with the key added or removed,
/// leaving the input untouched so a caller can still compare against the
/// previous selection.
pub fn toggle_row(selected: &FxHashSet<RowKey>, key: RowKey) -> FxHashSet<RowKey> {
    let mut next = selected.clone();
    if !next.remove(&key) {
        next.insert(key);
    }
    next
}

// ============================================================================
// ORCHESTRATOR
// ============================================================================

/// Executes the full pipeline: (raw rows, configuration, interaction state)
/// -> view. Pure: no caller state is touched, and re-running with the same
/// inputs yields the same view.
pub fn calculate_table(
    definition: &TableDefinition,
    rows: &[Row],
    state: &InteractionState,
) -> TableView {
    let mut columns = resolve_columns(definition, rows);

    let sort_field = state.sort_field.as_deref();
    for column in &mut columns {
        if column.is_sortable && sort_field == Some(column.id.as_str()) {
            column.sort_indicator = if state.sort_ascending {
                SortIndicator::Ascending
            } else {
                SortIndicator::Descending
            };
        }
    }

    let search_enabled = definition.searchable.engaged();
    let needle = state.search_value.to_lowercase();
    let mut working: Vec<&Row> = if search_enabled {
        rows.iter()
            .filter(|row| row_matches_search(&columns, &needle, row))
            .collect()
    } else {
        rows.iter().collect()
    };

    sort_rows(&mut working, sort_field, state.sort_ascending);

    let filtered_count = working.len();
    let max_page_index = max_page_index(filtered_count, definition.pagination, definition.page_size);
    let effective_page_index = state.effective_page_index();
    let page = page_slice(
        &working,
        definition.pagination,
        definition.page_size,
        effective_page_index,
    );

    let selection_enabled = selection_usable(
        &page,
        definition.value_field.as_deref(),
        definition.selection,
    );

    debug!(
        "table view: {}/{} rows after search, page {}/{} ({} displayed)",
        filtered_count,
        rows.len(),
        effective_page_index,
        max_page_index,
        page.len()
    );

    TableView {
        columns,
        rows: page.into_iter().cloned().collect(),
        filtered_count,
        max_page_index,
        effective_page_index,
        pagination: definition.pagination,
        page_size: definition.page_size,
        search_enabled,
        search_value: state.search_value.clone(),
        search_placeholder: definition.search_placeholder.clone(),
        sort_enabled: definition.sortable.engaged(),
        sort_field: state.sort_field.clone(),
        sort_ascending: state.sort_ascending,
        selection_enabled,
        value_field: definition.value_field.clone(),
        selected_rows: state.selected_rows.clone(),
    }
}

// ============================================================================
// TABLE ENGINE
// ============================================================================

/// Owns one table instance: definition, raw rows, and interaction state.
///
/// The presentation layer binds the `on_*` transitions to its controls and
/// calls `view()` after each one; the view is always a fresh, full
/// re-derivation. Single-owner, synchronous: transitions are applied one at
/// a time by the hosting event loop.
pub struct TableEngine {
    definition: TableDefinition,
    rows: Vec<Row>,
    state: InteractionState,
}

impl TableEngine {
    /// Creates an engine, failing fast on an invalid configuration.
    pub fn new(definition: TableDefinition, rows: Vec<Row>) -> Result<Self, ConfigurationError> {
        definition.validate()?;
        let state = InteractionState::from_definition(&definition);
        Ok(TableEngine {
            definition,
            rows,
            state,
        })
    }

    pub fn definition(&self) -> &TableDefinition {
        &self.definition
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Re-derives the view from the current inputs.
    pub fn view(&self) -> TableView {
        calculate_table(&self.definition, &self.rows, &self.state)
    }

    /// Replaces the raw rows. Interaction state is kept as-is; a now-stale
    /// page index simply yields an empty page until the next page event.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
    }

    /// Replaces the configuration, revalidating it. Interaction state is
    /// kept; columns and policies take effect on the next evaluation.
    pub fn set_definition(
        &mut self,
        definition: TableDefinition,
    ) -> Result<(), ConfigurationError> {
        definition.validate()?;
        self.definition = definition;
        Ok(())
    }

    /// Header click on a column. Ignored unless the column resolves and is
    /// sortable. Clicking the active sort column flips the direction;
    /// switching columns always enters ascending.
    pub fn on_header_click(&mut self, column_id: &str) {
        let columns = resolve_columns(&self.definition, &self.rows);
        let sortable = columns
            .iter()
            .any(|c| c.id == column_id && c.is_sortable);
        if !sortable {
            return;
        }

        if self.state.sort_field.as_deref() == Some(column_id) {
            self.state.sort_ascending = !self.state.sort_ascending;
        } else {
            self.state.sort_field = Some(column_id.to_string());
            self.state.sort_ascending = true;
        }
    }

    /// Search input change. The page index is deliberately left untouched:
    /// if the filtered set shrank beneath the current page, the paginator's
    /// empty-page fallback shows an empty page until the next page event.
    pub fn on_search_change(&mut self, value: impl Into<String>) {
        self.state.search_value = value.into();
    }

    /// "Next page" click. No-op when already at the upper bound.
    pub fn on_next_page(&mut self) {
        if !self.definition.pagination {
            return;
        }
        let view = self.view();
        if view.effective_page_index != view.max_page_index {
            self.state.commit_page_index(view.effective_page_index + 1);
        }
    }

    /// "Previous page" click. No-op when already at page 0.
    pub fn on_prev_page(&mut self) {
        if !self.definition.pagination {
            return;
        }
        let effective = self.state.effective_page_index();
        if effective != 0 {
            self.state.commit_page_index(effective - 1);
        }
    }

    /// Page-number input change, 1-based as typed. `None` means the field
    /// was cleared mid-edit. No bounds check here: an out-of-range commit
    /// shows an empty page.
    pub fn on_page_input(&mut self, page_number: Option<i64>) {
        if !self.definition.pagination {
            return;
        }
        match page_number {
            Some(n) => self.state.commit_page_index(n - 1),
            None => self.state.clear_page_index(),
        }
    }

    /// Row click. Toggles the row's selection when selection is usable for
    /// the current view and the row's key resolves. With multi-select off,
    /// clicking an unselected row replaces the selection.
    pub fn on_row_click(&mut self, row: &Row) {
        let view = self.view();
        if !view.selection_enabled {
            return;
        }
        let Some(key) = view.row_key(row) else {
            return;
        };

        if self.definition.select_multiple || self.state.selected_rows.contains(&key) {
            self.state.selected_rows = toggle_row(&self.state.selected_rows, key);
        } else {
            let mut next = FxHashSet::default();
            next.insert(key);
            self.state.selected_rows = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ColumnPolicy, ColumnSpec};

    fn create_test_rows() -> Vec<Row> {
        vec![
            Row::from_pairs([
                ("id", RowValue::Number(1.0)),
                ("name", RowValue::text("banana")),
                ("stock", RowValue::Number(20.0)),
            ]),
            Row::from_pairs([
                ("id", RowValue::Number(2.0)),
                ("name", RowValue::text("apple")),
                ("stock", RowValue::Number(5.0)),
            ]),
            Row::from_pairs([
                ("id", RowValue::Number(3.0)),
                ("name", RowValue::text("cherry")),
                ("stock", RowValue::Number(12.0)),
            ]),
        ]
    }

    fn create_test_definition() -> TableDefinition {
        let mut def = TableDefinition::default();
        def.searchable = ColumnPolicy::All(true);
        def.value_field = Some("id".to_string());
        def
    }

    #[test]
    fn test_columns_derived_from_key_union() {
        let mut rows = create_test_rows();
        rows.push(Row::from_pairs([
            ("id", RowValue::Number(4.0)),
            ("origin", RowValue::text("import")),
        ]));

        let columns = resolve_columns(&create_test_definition(), &rows);
        let ids: Vec<&str> = columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["id", "name", "stock", "origin"]);
    }

    #[test]
    fn test_explicit_columns_fall_back_to_id() {
        let mut def = create_test_definition();
        def.columns = Some(vec![
            ColumnSpec::new("name").display_name("Name"),
            ColumnSpec::new("stock"),
        ]);

        let columns = resolve_columns(&def, &create_test_rows());
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].display_name, "Name");
        assert_eq!(columns[1].display_name, "stock");
    }

    #[test]
    fn test_search_filters_across_searchable_columns() {
        let def = create_test_definition();
        let rows = create_test_rows();
        let mut state = InteractionState::from_definition(&def);
        state.search_value = "AN".to_string();

        let view = calculate_table(&def, &rows, &state);
        // "banana" matches; numeric columns render as digits and do not.
        assert_eq!(view.filtered_count, 1);
        assert_eq!(view.rows[0].display_value("name"), "banana");
    }

    #[test]
    fn test_search_policy_set_limits_matching() {
        let mut def = create_test_definition();
        def.searchable = ColumnPolicy::from(vec!["stock"]);
        let rows = create_test_rows();
        let mut state = InteractionState::from_definition(&def);
        state.search_value = "apple".to_string();

        let view = calculate_table(&def, &rows, &state);
        assert!(view.search_enabled);
        assert_eq!(view.filtered_count, 0);
        assert_eq!(view.max_page_index, 0);
    }

    #[test]
    fn test_sort_without_field_respects_direction_as_reversal() {
        let def = create_test_definition();
        let rows = create_test_rows();
        let mut state = InteractionState::from_definition(&def);
        state.sort_ascending = false;

        let view = calculate_table(&def, &rows, &state);
        let names: Vec<String> = view.rows.iter().map(|r| r.display_value("name")).collect();
        assert_eq!(names, vec!["cherry", "apple", "banana"]);
    }

    #[test]
    fn test_sort_by_field_orders_naturally() {
        let def = create_test_definition();
        let rows = create_test_rows();
        let mut state = InteractionState::from_definition(&def);
        state.sort_field = Some("stock".to_string());

        let view = calculate_table(&def, &rows, &state);
        let stocks: Vec<String> = view.rows.iter().map(|r| r.display_value("stock")).collect();
        assert_eq!(stocks, vec!["5", "12", "20"]);

        state.sort_ascending = false;
        let view = calculate_table(&def, &rows, &state);
        let stocks: Vec<String> = view.rows.iter().map(|r| r.display_value("stock")).collect();
        assert_eq!(stocks, vec!["20", "12", "5"]);
    }

    #[test]
    fn test_sort_missing_field_ranks_as_empty() {
        let def = create_test_definition();
        let mut rows = create_test_rows();
        rows.push(Row::from_pairs([("id", RowValue::Number(4.0))]));
        let mut state = InteractionState::from_definition(&def);
        state.sort_field = Some("name".to_string());

        let view = calculate_table(&def, &rows, &state);
        // The row without a name sorts before every named row.
        assert_eq!(view.rows[0].display_value("id"), "4");
    }

    #[test]
    fn test_pagination_bounds_and_empty_page_fallback() {
        let mut def = create_test_definition();
        def.pagination = true;
        def.page_size = 2;
        let rows = create_test_rows();
        let mut state = InteractionState::from_definition(&def);

        let view = calculate_table(&def, &rows, &state);
        assert_eq!(view.max_page_index, 1);
        assert_eq!(view.rows.len(), 2);

        state.commit_page_index(1);
        let view = calculate_table(&def, &rows, &state);
        assert_eq!(view.rows.len(), 1);

        // Stale index past the end: empty page, no panic.
        state.commit_page_index(9);
        let view = calculate_table(&def, &rows, &state);
        assert!(view.rows.is_empty());
        assert_eq!(view.max_page_index, 1);

        // Negative index (page input "0" in a 1-based field): same fallback.
        state.commit_page_index(-1);
        let view = calculate_table(&def, &rows, &state);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn test_empty_set_has_one_empty_page() {
        let mut def = create_test_definition();
        def.pagination = true;
        let state = InteractionState::from_definition(&def);

        let view = calculate_table(&def, &[], &state);
        assert_eq!(view.max_page_index, 0);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn test_selection_disabled_on_duplicate_keys() {
        let def = create_test_definition();
        let mut rows = create_test_rows();
        rows.push(Row::from_pairs([
            ("id", RowValue::Number(1.0)),
            ("name", RowValue::text("dupe")),
        ]));
        let state = InteractionState::from_definition(&def);

        let view = calculate_table(&def, &rows, &state);
        assert!(!view.selection_enabled);
    }

    #[test]
    fn test_selection_requires_key_on_every_displayed_row() {
        let def = create_test_definition();
        let mut rows = create_test_rows();
        rows.push(Row::from_pairs([("name", RowValue::text("ghost"))]));
        let state = InteractionState::from_definition(&def);

        let view = calculate_table(&def, &rows, &state);
        assert!(!view.selection_enabled);
    }

    #[test]
    fn test_toggle_is_copy_on_write() {
        let mut selected = FxHashSet::default();
        selected.insert(RowKey::number(1.0));

        let next = toggle_row(&selected, RowKey::number(2.0));
        assert_eq!(selected.len(), 1);
        assert_eq!(next.len(), 2);

        let back = toggle_row(&next, RowKey::number(2.0));
        assert_eq!(back, selected);
    }
}
