//! What an upsert does when it hits an existing row.

use crate::row::Row;
use crate::value::Value;

/// One assignment of an upsert's update clause.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateEntry {
    /// Set the column to the value that was about to be inserted.
    Column(String),
    /// Set the column to an explicit value or raw expression.
    Assign(String, Value),
}

impl UpdateEntry {
    /// Returns the column this entry updates.
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::Column(column) | Self::Assign(column, _) => column,
        }
    }
}

/// The update clause of an upsert, in assignment order.
///
/// An *empty* spec means "insert only": conflicting rows fail with the
/// database's unique-constraint error. An *omitted* spec (`None` where an
/// `Option<UpdateSpec>` is taken) means "update every inserted column".
///
/// ```rust
/// use oxide_upsert_core::update::UpdateSpec;
/// use oxide_upsert_core::value::raw;
///
/// let update = UpdateSpec::new()
///     .set("views", raw("stats.views + 1"))
///     .set("was_updated", true)
///     .column("updated_at");
/// assert_eq!(update.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSpec {
    entries: Vec<UpdateEntry>,
}

impl UpdateSpec {
    /// Creates an empty spec (insert only).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a spec that copies the inserted value of each column.
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: columns
                .into_iter()
                .map(|column| UpdateEntry::Column(column.into()))
                .collect(),
        }
    }

    /// Creates the default spec for a set of rows: every column of the
    /// first row, copied from the inserted values.
    #[must_use]
    pub fn from_row(row: &Row) -> Self {
        Self::columns(row.columns())
    }

    /// Appends a column copied from the inserted value.
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.entries.push(UpdateEntry::Column(column.into()));
        self
    }

    /// Appends an explicit assignment.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries
            .push(UpdateEntry::Assign(column.into(), value.into()));
        self
    }

    /// Appends an entry in place.
    pub fn push(&mut self, entry: UpdateEntry) {
        self.entries.push(entry);
    }

    /// Returns whether any entry updates the given column.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.entries.iter().any(|entry| entry.column() == column)
    }

    /// Returns the entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &UpdateEntry> {
        self.entries.iter()
    }

    /// Returns the values of explicit assignments in order.
    pub fn assigned_values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().filter_map(|entry| match entry {
            UpdateEntry::Column(_) => None,
            UpdateEntry::Assign(_, value) => Some(value),
        })
    }

    /// Returns whether the spec has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl From<&[&str]> for UpdateSpec {
    fn from(columns: &[&str]) -> Self {
        Self::columns(columns.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for UpdateSpec {
    fn from(columns: [&str; N]) -> Self {
        Self::columns(columns)
    }
}

impl From<Vec<&str>> for UpdateSpec {
    fn from(columns: Vec<&str>) -> Self {
        Self::columns(columns)
    }
}

impl From<Vec<UpdateEntry>> for UpdateSpec {
    fn from(entries: Vec<UpdateEntry>) -> Self {
        Self { entries }
    }
}

impl FromIterator<UpdateEntry> for UpdateSpec {
    fn from_iter<I: IntoIterator<Item = UpdateEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
