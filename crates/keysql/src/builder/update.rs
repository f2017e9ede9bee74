//! UPDATE, including arithmetic assignments and REPLACE() substitutions.

use super::Builder;
use crate::clause::Clauses;
use crate::condition::key::split_suffix;
use crate::error::{SqlError, SqlResult};
use crate::ident::{quote_column, strip_raw_marker};
use crate::quote::{quote_literal, quote_value};
use crate::value::{Record, Value};
use crate::write::UpdateSpec;

/// Arithmetic suffix of an UPDATE key: `hits[+]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }

    fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "+" => Some(ArithOp::Add),
            "-" => Some(ArithOp::Sub),
            "*" => Some(ArithOp::Mul),
            "/" => Some(ArithOp::Div),
            _ => None,
        }
    }
}

/// One `col = REPLACE(col, search, replace)` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub column: String,
    pub search: String,
    pub replace: String,
}

impl Replacement {
    pub fn new(
        column: impl Into<String>,
        search: impl Into<String>,
        replace: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            search: search.into(),
            replace: replace.into(),
        }
    }
}

impl Builder {
    /// Compile an UPDATE.
    ///
    /// `col[+]`, `col[-]`, `col[*]` and `col[/]` keys with a numeric value become
    /// `col = col OP value`; any other value under such a key is rejected.
    pub fn update(&self, table: &str, set: &Record, clauses: &Clauses) -> SqlResult<String> {
        let table = self.table(table)?;
        if set.is_empty() {
            return Err(SqlError::malformed("UPDATE has nothing to set"));
        }

        let assignments = set
            .iter()
            .map(|(key, value)| self.assignment(key, value))
            .collect::<SqlResult<Vec<_>>>()?;

        Ok(format!(
            "UPDATE {table} SET {}{}",
            assignments.join(", "),
            clauses.to_sql(&self.config)?
        ))
    }

    /// [`Builder::update`] for an [`UpdateSpec`].
    pub fn update_from(&self, spec: &UpdateSpec) -> SqlResult<String> {
        self.update(&spec.table, &spec.set, &spec.clauses)
    }

    /// Compile an UPDATE made of `REPLACE()` substitutions.
    pub fn replace(
        &self,
        table: &str,
        replacements: &[Replacement],
        clauses: &Clauses,
    ) -> SqlResult<String> {
        let table = self.table(table)?;
        if replacements.is_empty() {
            return Err(SqlError::malformed("REPLACE has no substitutions"));
        }

        let dialect = self.config.dialect;
        let assignments: Vec<String> = replacements
            .iter()
            .map(|r| {
                let col = quote_column(&self.config, &r.column);
                format!(
                    "{col} = REPLACE({col}, {}, {})",
                    quote_literal(dialect, &r.search),
                    quote_literal(dialect, &r.replace)
                )
            })
            .collect();

        Ok(format!(
            "UPDATE {table} SET {}{}",
            assignments.join(", "),
            clauses.to_sql(&self.config)?
        ))
    }

    fn assignment(&self, key: &str, value: &Value) -> SqlResult<String> {
        let (_, rest) = strip_raw_marker(key);
        let (column, op) = split_suffix(rest, key, ArithOp::from_suffix)?;
        let col = quote_column(&self.config, column);

        match op {
            None => Ok(format!("{col} = {}", quote_value(&self.config, key, value)?)),
            Some(op) => {
                let number = value.numeric_sql().ok_or_else(|| {
                    SqlError::unsupported(
                        column,
                        format!("[{}]", op.symbol()),
                        value.tag().as_str(),
                    )
                })??;
                Ok(format!("{col} = {col} {} {number}", op.symbol()))
            }
        }
    }
}
