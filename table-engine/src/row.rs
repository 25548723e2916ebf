//! FILENAME: table-engine/src/row.rs
//! PURPOSE: Defines the row record model the table engine operates on.
//! CONTEXT: A `Row` is an opaque, ordered mapping from field name to a
//! displayable primitive. Rows arrive from the caller and are never mutated
//! by the engine; every transform produces new sequences or views.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// ROW VALUES
// ============================================================================

/// A displayable primitive stored in one field of a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl RowValue {
    pub fn text(s: impl Into<String>) -> Self {
        RowValue::Text(s.into())
    }

    /// Returns the display string for this value.
    /// This is what the search filter matches against and what the default
    /// cell rendering shows when no custom renderer is configured.
    pub fn display_value(&self) -> String {
        match self {
            RowValue::Empty => String::new(),
            RowValue::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            RowValue::Text(s) => s.clone(),
            RowValue::Boolean(b) => {
                if *b { "TRUE" } else { "FALSE" }.to_string()
            }
        }
    }

    /// Derives the hashable identity of this value, if it has one.
    /// `Empty` carries no identity: a row without a value for the key field
    /// can never be selected.
    pub fn as_key(&self) -> Option<RowKey> {
        match self {
            RowValue::Empty => None,
            RowValue::Number(n) => Some(RowKey::Number(OrderedFloat(*n))),
            RowValue::Text(s) => Some(RowKey::Text(s.clone())),
            RowValue::Boolean(b) => Some(RowKey::Boolean(*b)),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RowValue::Empty)
    }
}

impl From<f64> for RowValue {
    fn from(value: f64) -> Self {
        RowValue::Number(value)
    }
}

impl From<&str> for RowValue {
    fn from(value: &str) -> Self {
        RowValue::Text(value.to_string())
    }
}

impl From<String> for RowValue {
    fn from(value: String) -> Self {
        RowValue::Text(value)
    }
}

impl From<bool> for RowValue {
    fn from(value: bool) -> Self {
        RowValue::Boolean(value)
    }
}

/// Compares two values by their natural ordering: numeric for numbers,
/// lexical for text. Values of different types order by type rank
/// (Empty < Boolean < Number < Text) so heterogeneous columns still sort
/// deterministically. NaN compares equal to whatever it meets.
pub fn compare_values(a: &RowValue, b: &RowValue) -> Ordering {
    match (a, b) {
        (RowValue::Number(x), RowValue::Number(y)) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        (RowValue::Text(x), RowValue::Text(y)) => x.cmp(y),
        (RowValue::Boolean(x), RowValue::Boolean(y)) => x.cmp(y),
        (RowValue::Empty, RowValue::Empty) => Ordering::Equal,
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &RowValue) -> u8 {
    match value {
        RowValue::Empty => 0,
        RowValue::Boolean(_) => 1,
        RowValue::Number(_) => 2,
        RowValue::Text(_) => 3,
    }
}

// ============================================================================
// ORDERED FLOAT
// ============================================================================

/// Wrapper around f64 that implements Eq and Hash for use in key sets.
/// NaN values are treated as equal to each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            // All NaN values hash to the same thing
            u64::MAX.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

// ============================================================================
// ROW KEYS
// ============================================================================

/// A normalized, hashable row identity taken from the designated key field.
/// Used as the member type of the selection set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowKey {
    Number(OrderedFloat),
    Text(String),
    Boolean(bool),
}

impl RowKey {
    pub fn number(n: f64) -> Self {
        RowKey::Number(OrderedFloat(n))
    }

    pub fn text(s: impl Into<String>) -> Self {
        RowKey::Text(s.into())
    }
}

// ============================================================================
// ROW
// ============================================================================

/// One record of tabular data: an ordered list of named values.
/// Field order is preserved as supplied, which is what lets the column
/// resolver derive headers in first-seen order from heterogeneous rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    fields: Vec<(String, RowValue)>,
}

impl Row {
    pub fn new() -> Self {
        Row { fields: Vec::new() }
    }

    /// Builds a row from (name, value) pairs. Later duplicates replace
    /// earlier ones, keeping the first-seen position.
    pub fn from_pairs<N, V, I>(pairs: I) -> Self
    where
        N: Into<String>,
        V: Into<RowValue>,
        I: IntoIterator<Item = (N, V)>,
    {
        let mut row = Row::new();
        for (name, value) in pairs {
            row.insert(name, value);
        }
        row
    }

    /// Sets a field value. An existing field keeps its position and has its
    /// value replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RowValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    /// Looks up a field value by name.
    pub fn get(&self, field: &str) -> Option<&RowValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Returns the display string for a field, or the empty string when the
    /// field is missing. Missing and `Empty` are indistinguishable here:
    /// both never match a non-empty search term and always match the empty
    /// one.
    pub fn display_value(&self, field: &str) -> String {
        self.get(field).map(RowValue::display_value).unwrap_or_default()
    }

    /// Derives the row's identity from the designated key field.
    pub fn key(&self, value_field: &str) -> Option<RowKey> {
        self.get(value_field).and_then(RowValue::as_key)
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn fields(&self) -> &[(String, RowValue)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<N: Into<String>, V: Into<RowValue>> FromIterator<(N, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Row::from_pairs(iter)
    }
}
