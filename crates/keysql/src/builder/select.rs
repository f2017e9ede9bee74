//! SELECT and its derivatives: `get`, `has`, aggregates and `headers`.

use super::Builder;
use crate::clause::Limit;
use crate::config::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::ident::{quote_column, quote_name, quote_table, split_alias};
use crate::query::{Aggregate, Column, Columns, Fun, Join, JoinOn, QuerySpec};

impl Builder {
    /// Compile a SELECT.
    pub fn select(&self, spec: &QuerySpec) -> SqlResult<String> {
        let (main_ref, from) = self.table_expr(&spec.table)?;

        let mut sql = String::from("SELECT ");
        sql.push_str(&self.projection(spec)?);
        sql.push_str(" FROM ");
        sql.push_str(&from);
        for join in &spec.joins {
            sql.push(' ');
            sql.push_str(&self.join_clause(join, &main_ref)?);
        }
        sql.push_str(&spec.clauses.to_sql(&self.config)?);
        Ok(sql)
    }

    /// SELECT of at most one row.
    ///
    /// Any limit already set is replaced. On MSSQL without an ORDER BY the row
    /// order is left to the server with `ORDER BY (SELECT NULL)`.
    pub fn get(&self, spec: &QuerySpec) -> SqlResult<String> {
        let mut spec = spec.clone();
        let dialect = self.config.dialect;
        if dialect == Dialect::Mssql && spec.clauses.order.is_none() {
            spec.clauses.limit = None;
            let limit = Limit::Count(1).to_sql(dialect, true)?;
            return Ok(format!("{} ORDER BY (SELECT NULL){limit}", self.select(&spec)?));
        }
        spec.clauses.limit = Some(Limit::Count(1));
        self.select(&spec)
    }

    /// `SELECT EXISTS(SELECT 1 FROM ...)`.
    ///
    /// The requested projection is ignored.
    pub fn has(&self, spec: &QuerySpec) -> SqlResult<String> {
        let mut spec = spec.clone();
        spec.columns = Columns::All;
        spec.fun = Some(Fun::Exists);
        Ok(format!("SELECT EXISTS({})", self.select(&spec)?))
    }

    /// SELECT wrapping the projection in `aggregate`: `SELECT COUNT(*) FROM ...`.
    pub fn aggregate(&self, aggregate: Aggregate, spec: &QuerySpec) -> SqlResult<String> {
        let mut spec = spec.clone();
        spec.fun = Some(Fun::Aggregate(aggregate));
        self.select(&spec)
    }

    /// `SELECT * FROM "t"`, executed only to read column metadata.
    pub fn headers(&self, table: &str) -> SqlResult<String> {
        Ok(format!("SELECT * FROM {}", self.table(table)?))
    }

    /// Returns the quoted name other clauses use for the main table, and the
    /// FROM expression.
    fn table_expr(&self, table: &str) -> SqlResult<(String, String)> {
        let table = table.trim();
        match split_alias(table) {
            Some((name, alias)) => {
                let name = self.table(name)?;
                let alias = quote_table(&self.config, alias);
                Ok((alias.clone(), format!("{name} AS {alias}")))
            }
            None => {
                let name = self.table(table)?;
                Ok((name.clone(), name))
            }
        }
    }

    fn projection(&self, spec: &QuerySpec) -> SqlResult<String> {
        if spec.fun == Some(Fun::Exists) {
            return Ok("1".to_string());
        }

        let columns = match &spec.columns {
            Columns::All => "*".to_string(),
            Columns::List(list) if list.is_empty() => {
                return Err(SqlError::malformed("empty column list"));
            }
            Columns::List(list) => list
                .iter()
                .map(|c| self.column(c))
                .collect::<Vec<_>>()
                .join(","),
        };

        Ok(match spec.fun {
            Some(Fun::Aggregate(f)) => format!("{}({columns})", f.as_sql()),
            _ => columns,
        })
    }

    fn column(&self, column: &Column) -> String {
        let quoted = quote_column(&self.config, &column.name);
        let expr = match column.aggregate {
            Some(f) => format!("{}({quoted})", f.as_sql()),
            None => quoted,
        };
        match &column.alias {
            Some(alias) => format!("{expr} AS {}", quote_name(&self.config, alias)),
            None => expr,
        }
    }

    fn join_clause(&self, join: &Join, main_ref: &str) -> SqlResult<String> {
        let mut target = self.table(&join.table)?;
        if let Some(alias) = &join.alias {
            target.push_str(" AS ");
            target.push_str(&quote_table(&self.config, alias));
        }

        let relation = match &join.relation {
            JoinOn::Using(columns) if !columns.is_empty() => {
                let cols: Vec<String> =
                    columns.iter().map(|c| quote_name(&self.config, c)).collect();
                format!("USING ({})", cols.join(", "))
            }
            JoinOn::On(pairs) if !pairs.is_empty() => {
                let joined_ref = quote_table(&self.config, join.reference());
                let conds: Vec<String> = pairs
                    .iter()
                    .map(|(left, right)| {
                        let left = if left.find('.').is_some_and(|p| p > 0) {
                            quote_column(&self.config, left)
                        } else {
                            format!("{main_ref}.{}", quote_name(&self.config, left))
                        };
                        format!("{left} = {joined_ref}.{}", quote_name(&self.config, right))
                    })
                    .collect();
                format!("ON {}", conds.join(" AND "))
            }
            _ => {
                return Err(SqlError::malformed(format!(
                    "join on '{}' has no relation columns",
                    join.table
                )));
            }
        };

        Ok(format!("{} {target} {relation}", join.kind.as_sql()))
    }
}
