//! FILENAME: table-engine/tests/test_pagination.rs
//! Integration tests for the paginator.

mod common;

use common::{numbered_rows, CatalogFixture};
use table_engine::{calculate_table, InteractionState, Row, TableDefinition};

fn paged_definition(page_size: usize) -> TableDefinition {
    let mut def = CatalogFixture::definition();
    def.pagination = true;
    def.page_size = page_size;
    def
}

#[test]
fn test_23_rows_by_10_has_three_pages() {
    let def = paged_definition(10);
    let rows = numbered_rows(23);
    let mut state = InteractionState::from_definition(&def);

    let view = calculate_table(&def, &rows, &state);
    assert_eq!(view.max_page_index, 2);
    assert_eq!(view.rows.len(), 10);

    state.commit_page_index(2);
    let view = calculate_table(&def, &rows, &state);
    assert_eq!(view.rows.len(), 3);
}

#[test]
fn test_concatenated_pages_reconstruct_the_set() {
    let rows = numbered_rows(23);

    for page_size in [1, 3, 10, 23, 40] {
        let def = paged_definition(page_size);
        let mut state = InteractionState::from_definition(&def);
        let max = calculate_table(&def, &rows, &state).max_page_index;

        let mut rebuilt: Vec<Row> = Vec::new();
        for page in 0..=max {
            state.commit_page_index(page);
            rebuilt.extend(calculate_table(&def, &rows, &state).rows);
        }

        // No gaps, no duplicates, original order.
        assert_eq!(rebuilt, rows, "page_size {}", page_size);
    }
}

#[test]
fn test_pagination_disabled_returns_everything() {
    let mut def = CatalogFixture::definition();
    def.pagination = false;
    let rows = numbered_rows(50);
    let state = InteractionState::from_definition(&def);

    let view = calculate_table(&def, &rows, &state);
    assert_eq!(view.rows.len(), 50);
    assert_eq!(view.max_page_index, 0);
}

#[test]
fn test_stale_index_shows_empty_page() {
    let def = paged_definition(10);
    let mut state = InteractionState::from_definition(&def);

    // Paginate to the last page of a 23-row set, then shrink the set.
    let rows = numbered_rows(23);
    state.commit_page_index(2);
    let view = calculate_table(&def, &rows, &state);
    assert_eq!(view.rows.len(), 3);

    let shrunk = numbered_rows(7);
    let view = calculate_table(&def, &shrunk, &state);
    assert!(view.rows.is_empty());
    assert_eq!(view.max_page_index, 0);
    assert_eq!(view.effective_page_index, 2);
}

#[test]
fn test_empty_set_is_one_empty_page() {
    let def = paged_definition(10);
    let state = InteractionState::from_definition(&def);

    let view = calculate_table(&def, &[], &state);
    assert_eq!(view.max_page_index, 0);
    assert!(view.rows.is_empty());
    assert!(view.next_disabled());
    assert!(view.prev_disabled());
}

#[test]
fn test_exact_multiple_has_no_trailing_page() {
    let def = paged_definition(10);
    let rows = numbered_rows(30);
    let state = InteractionState::from_definition(&def);

    let view = calculate_table(&def, &rows, &state);
    assert_eq!(view.max_page_index, 2);
}

#[test]
fn test_filtered_count_reports_pre_page_total() {
    let def = paged_definition(10);
    let rows = numbered_rows(23);
    let state = InteractionState::from_definition(&def);

    let view = calculate_table(&def, &rows, &state);
    assert_eq!(view.filtered_count, 23);
    assert_eq!(view.rows.len(), 10);
}
