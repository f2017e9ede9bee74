//! The execution boundary: callers plug a database driver in behind [`Executor`].
//!
//! keysql never opens connections itself. Compilation produces SQL text; an
//! `Executor` runs it and hands rows back as a [`RowSet`].

use crate::error::SqlResult;
use crate::value::{Record, Value};
use std::sync::Arc;

/// A trait that runs compiled SQL against a database.
///
/// Implementations wrap a real driver (or a test double). Errors should be
/// reported as [`crate::SqlError::Execution`].
pub trait Executor: Send + Sync {
    /// Run a statement that returns rows.
    fn query(&self, sql: &str) -> SqlResult<RowSet>;

    /// Run a statement that returns rows, associating a tag for observability.
    ///
    /// The default implementation ignores `tag` and calls [`Executor::query`].
    fn query_tagged(&self, tag: &str, sql: &str) -> SqlResult<RowSet> {
        let _ = tag;
        self.query(sql)
    }

    /// Run a statement and return the number of affected rows.
    fn execute(&self, sql: &str) -> SqlResult<u64>;

    /// Run a statement and return the number of affected rows, associating a tag.
    ///
    /// The default implementation ignores `tag` and calls [`Executor::execute`].
    fn execute_tagged(&self, tag: &str, sql: &str) -> SqlResult<u64> {
        let _ = tag;
        self.execute(sql)
    }

    /// Driver-side literal quoting.
    ///
    /// `None` (the default) means the built-in dialect escaping is used.
    fn quote_literal(&self, text: &str) -> Option<String> {
        let _ = text;
        None
    }

    /// Identifier generated by the most recent INSERT, if the driver reports one.
    fn last_insert_id(&self) -> Option<String> {
        None
    }
}

impl<E: Executor + ?Sized> Executor for &E {
    fn query(&self, sql: &str) -> SqlResult<RowSet> {
        (**self).query(sql)
    }

    fn query_tagged(&self, tag: &str, sql: &str) -> SqlResult<RowSet> {
        (**self).query_tagged(tag, sql)
    }

    fn execute(&self, sql: &str) -> SqlResult<u64> {
        (**self).execute(sql)
    }

    fn execute_tagged(&self, tag: &str, sql: &str) -> SqlResult<u64> {
        (**self).execute_tagged(tag, sql)
    }

    fn quote_literal(&self, text: &str) -> Option<String> {
        (**self).quote_literal(text)
    }

    fn last_insert_id(&self) -> Option<String> {
        (**self).last_insert_id()
    }
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    fn query(&self, sql: &str) -> SqlResult<RowSet> {
        (**self).query(sql)
    }

    fn query_tagged(&self, tag: &str, sql: &str) -> SqlResult<RowSet> {
        (**self).query_tagged(tag, sql)
    }

    fn execute(&self, sql: &str) -> SqlResult<u64> {
        (**self).execute(sql)
    }

    fn execute_tagged(&self, tag: &str, sql: &str) -> SqlResult<u64> {
        (**self).execute_tagged(tag, sql)
    }

    fn quote_literal(&self, text: &str) -> Option<String> {
        (**self).quote_literal(text)
    }

    fn last_insert_id(&self) -> Option<String> {
        (**self).last_insert_id()
    }
}

/// Rows returned by an [`Executor`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    /// Column names, in result order.
    pub columns: Vec<String>,
    /// Row values, each aligned with `columns`.
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First column of the first row.
    pub fn scalar(&self) -> Option<&Value> {
        self.rows.first().and_then(|row| row.first())
    }

    /// Row `index` as a column-keyed record.
    pub fn record(&self, index: usize) -> Option<Record> {
        let row = self.rows.get(index)?;
        Some(
            self.columns
                .iter()
                .zip(row)
                .map(|(c, v)| (c.clone(), v.clone()))
                .collect(),
        )
    }

    /// All rows as column-keyed records.
    pub fn records(&self) -> Vec<Record> {
        (0..self.rows.len()).filter_map(|i| self.record(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_zip_columns() {
        let set = RowSet::new(
            vec!["id".into(), "name".into()],
            vec![
                vec![Value::Int(1), Value::from("a")],
                vec![Value::Int(2), Value::Null],
            ],
        );
        assert_eq!(set.scalar(), Some(&Value::Int(1)));
        let records = set.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("name"), Some(&Value::Null));
        assert_eq!(set.record(5), None);
    }

    #[test]
    fn empty_set() {
        let set = RowSet::default();
        assert!(set.is_empty());
        assert_eq!(set.scalar(), None);
    }
}
