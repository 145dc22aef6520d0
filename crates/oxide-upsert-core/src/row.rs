//! Rows and row normalization.
//!
//! Multi-row statements bind values positionally, so every row must present
//! its columns in the same order. [`normalize`] sorts each row's columns and
//! checks that all rows share one column set.

use crate::error::{Error, Result};
use crate::value::Value;

/// A single row to write: column name to value.
///
/// Column order is whatever the caller used; it is fixed up by
/// [`normalize`] before compilation.
///
/// ```rust
/// use oxide_upsert_core::row::Row;
/// use oxide_upsert_core::value::raw;
///
/// let row = Row::new()
///     .set("post_id", 1)
///     .set("views", raw("views + 1"));
/// assert_eq!(row.columns().collect::<Vec<_>>(), vec!["post_id", "views"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets a column, replacing any previous value for it.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Sets a column in place, replacing any previous value for it.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Returns the value of a column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Returns whether the row has the given column.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Returns the column names in row order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the values in row order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Returns `(column, value)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the row with its columns sorted by name.
    #[must_use]
    pub fn sorted(mut self) -> Self {
        self.entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        self
    }

    fn same_columns(&self, other: &Self) -> bool {
        self.len() == other.len() && self.columns().all(|column| other.contains(column))
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

/// The rows handed to a write: one row or many.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rows(Vec<Row>);

impl Rows {
    /// Returns whether there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first row.
    #[must_use]
    pub fn first(&self) -> Option<&Row> {
        self.0.first()
    }

    /// Returns a mutable iterator over the rows.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.0.iter_mut()
    }

    /// Returns the rows as a vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<Row> {
        self.0
    }
}

impl From<Row> for Rows {
    fn from(row: Row) -> Self {
        Self(vec![row])
    }
}

impl From<Vec<Row>> for Rows {
    fn from(rows: Vec<Row>) -> Self {
        Self(rows)
    }
}

impl<const N: usize> From<[Row; N]> for Rows {
    fn from(rows: [Row; N]) -> Self {
        Self(rows.into())
    }
}

impl From<&[Row]> for Rows {
    fn from(rows: &[Row]) -> Self {
        Self(rows.to_vec())
    }
}

/// Canonicalizes rows for a multi-row statement.
///
/// Sorts each row's columns by name and checks that every row has the same
/// columns as the first one. Normalizing normalized rows is a no-op.
///
/// # Errors
///
/// Returns [`Error::Validation`] if there are no rows, the first row has no
/// columns, or a row's columns differ from the first row's.
pub fn normalize(rows: impl Into<Rows>) -> Result<Vec<Row>> {
    let rows: Vec<Row> = rows.into().0.into_iter().map(Row::sorted).collect();

    let Some(first) = rows.first() else {
        return Err(Error::Validation(String::from("no rows to write")));
    };
    if first.is_empty() {
        return Err(Error::Validation(String::from("row 0 has no columns")));
    }

    if let Some(index) = rows.iter().position(|row| !row.same_columns(first)) {
        let expected: Vec<&str> = first.columns().collect();
        let found: Vec<&str> = rows[index].columns().collect();
        return Err(Error::Validation(format!(
            "row {index} has columns ({}) but row 0 has ({})",
            found.join(", "),
            expected.join(", ")
        )));
    }

    Ok(rows)
}
