use std::sync::Mutex;

use oxide_upsert_core::SqlValue;

use crate::connection::Connection;
use crate::error::Result;

/// Records statements instead of running them.
///
/// Reports one affected row per binding.
#[derive(Debug, Default)]
pub(crate) struct RecordingConnection {
    statements: Mutex<Vec<(String, Vec<SqlValue>)>>,
}

impl RecordingConnection {
    pub(crate) fn statements(&self) -> Vec<(String, Vec<SqlValue>)> {
        self.statements.lock().unwrap().clone()
    }
}

impl Connection for RecordingConnection {
    async fn affecting_statement(&self, sql: &str, bindings: Vec<SqlValue>) -> Result<u64> {
        let affected = bindings.len() as u64;
        self.statements
            .lock()
            .unwrap()
            .push((sql.to_string(), bindings));
        Ok(affected)
    }
}
