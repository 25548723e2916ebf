//! FILENAME: table-engine/tests/common/mod.rs
//! Shared fixtures for table-engine integration tests.

use table_engine::{ColumnPolicy, Row, RowValue, TableDefinition};

/// Small product catalog with a unique numeric id per row.
pub struct CatalogFixture;

impl CatalogFixture {
    pub fn rows() -> Vec<Row> {
        vec![
            Self::row(1.0, "banana", "fruit", 20.0),
            Self::row(2.0, "apple", "fruit", 5.0),
            Self::row(3.0, "carrot", "vegetable", 12.0),
            Self::row(4.0, "cherry", "fruit", 12.0),
            Self::row(5.0, "leek", "vegetable", 2.0),
        ]
    }

    pub fn row(id: f64, name: &str, category: &str, stock: f64) -> Row {
        Row::from_pairs([
            ("id", RowValue::Number(id)),
            ("name", RowValue::text(name)),
            ("category", RowValue::text(category)),
            ("stock", RowValue::Number(stock)),
        ])
    }

    /// Searchable everywhere, selection keyed on `id`.
    pub fn definition() -> TableDefinition {
        let mut def = TableDefinition::default();
        def.searchable = ColumnPolicy::All(true);
        def.value_field = Some("id".to_string());
        def
    }
}

/// Generates `count` uniform rows with a unique id and a zero-padded label.
pub fn numbered_rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            Row::from_pairs([
                ("id", RowValue::Number(i as f64)),
                ("label", RowValue::text(format!("item {:02}", i))),
            ])
        })
        .collect()
}
