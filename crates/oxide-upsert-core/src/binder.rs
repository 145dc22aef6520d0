//! Bind list assembly.
//!
//! Placeholders appear in the SQL text in this order, for every dialect:
//! row values in row-major order, then explicit update assignments in spec
//! order. Raw expressions and positional update entries bind nothing.

use crate::error::{Error, Result};
use crate::grammar::Sql;
use crate::row::Row;
use crate::update::UpdateSpec;
use crate::value::SqlValue;

/// A compiled statement and the values to bind to it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    /// SQL text.
    pub sql: String,
    /// Bind values, in placeholder order.
    pub bindings: Vec<SqlValue>,
}

impl CompiledStatement {
    /// Pairs compiled SQL with its bindings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] if the number of placeholders the grammar
    /// rendered differs from the number of bindings.
    pub fn new(sql: Sql, bindings: Vec<SqlValue>) -> Result<Self> {
        if sql.placeholders != bindings.len() {
            return Err(Error::Binding {
                placeholders: sql.placeholders,
                bindings: bindings.len(),
            });
        }
        Ok(Self {
            sql: sql.text,
            bindings,
        })
    }
}

/// Computes the bind list for normalized rows and an optional update spec.
#[must_use]
pub fn bindings(rows: &[Row], update: Option<&UpdateSpec>) -> Vec<SqlValue> {
    let row_values = rows.iter().flat_map(Row::values);
    let update_values = update.into_iter().flat_map(UpdateSpec::assigned_values);

    row_values
        .chain(update_values)
        .filter_map(|value| value.as_bound().cloned())
        .collect()
}
