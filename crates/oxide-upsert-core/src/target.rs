//! Conflict targets.

/// The columns of the unique constraint an upsert must respect.
///
/// Order is significant: the SQL Server MERGE join condition lists the
/// columns left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictTarget(Vec<String>);

impl ConflictTarget {
    /// Creates a target from column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(columns.into_iter().map(Into::into).collect())
    }

    /// Returns the column names.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns whether the target names no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<&str> for ConflictTarget {
    fn from(column: &str) -> Self {
        Self(vec![String::from(column)])
    }
}

impl From<String> for ConflictTarget {
    fn from(column: String) -> Self {
        Self(vec![column])
    }
}

impl From<&[&str]> for ConflictTarget {
    fn from(columns: &[&str]) -> Self {
        Self::new(columns.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for ConflictTarget {
    fn from(columns: [&str; N]) -> Self {
        Self::new(columns)
    }
}

impl From<Vec<&str>> for ConflictTarget {
    fn from(columns: Vec<&str>) -> Self {
        Self::new(columns)
    }
}

impl From<Vec<String>> for ConflictTarget {
    fn from(columns: Vec<String>) -> Self {
        Self(columns)
    }
}
