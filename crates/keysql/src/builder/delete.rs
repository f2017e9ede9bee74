use super::Builder;
use crate::clause::Clauses;
use crate::config::Dialect;
use crate::error::SqlResult;
use crate::write::DeleteSpec;

impl Builder {
    /// Compile a DELETE.
    pub fn delete(&self, table: &str, clauses: &Clauses) -> SqlResult<String> {
        let table = self.table(table)?;
        Ok(format!(
            "DELETE FROM {table}{}",
            clauses.to_sql(&self.config)?
        ))
    }

    pub fn delete_from(&self, spec: &DeleteSpec) -> SqlResult<String> {
        self.delete(&spec.table, &spec.clauses)
    }

    /// `TRUNCATE TABLE "t"`. SQLite has no TRUNCATE.
    pub fn truncate(&self, table: &str) -> SqlResult<String> {
        if self.config.dialect == Dialect::Sqlite {
            return Err(self.config.dialect.mismatch("TRUNCATE TABLE"));
        }
        Ok(format!("TRUNCATE TABLE {}", self.table(table)?))
    }
}
