//! INSERT / REPLACE INTO.

use super::Builder;
use crate::error::{SqlError, SqlResult};
use crate::ident::quote_column;
use crate::quote::quote_value;
use crate::value::Record;
use crate::write::InsertSpec;
use std::fmt;

/// MySQL scheduling modifier for INSERT / REPLACE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertModifier {
    LowPriority,
    Delayed,
}

impl InsertModifier {
    pub fn as_sql(&self) -> &'static str {
        match self {
            InsertModifier::LowPriority => "LOW_PRIORITY",
            InsertModifier::Delayed => "DELAYED",
        }
    }
}

/// The statement verb: `INSERT`, `REPLACE`, `INSERT LOW_PRIORITY IGNORE`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsertVerb {
    pub replace: bool,
    pub modifier: Option<InsertModifier>,
    pub ignore: bool,
}

impl InsertVerb {
    /// Plain `INSERT`.
    pub fn insert() -> Self {
        Self::default()
    }

    /// `REPLACE`.
    pub fn replace() -> Self {
        Self {
            replace: true,
            ..Self::default()
        }
    }

    pub fn modifier(mut self, modifier: InsertModifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    /// Whether this is anything other than plain `INSERT`.
    pub fn is_extended(&self) -> bool {
        *self != Self::insert()
    }

    /// Parse leniently from text such as `"INSERT IGNORE"` or `"REPLACE DELAYED"`.
    ///
    /// Unknown words are dropped. More than three words gives plain `INSERT`.
    pub fn parse(text: &str) -> Self {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() > 3 {
            return Self::insert();
        }

        let mut verb = match words.first() {
            Some(w) if w.eq_ignore_ascii_case("replace") => Self::replace(),
            _ => Self::insert(),
        };
        if let Some(second) = words.get(1) {
            if second.eq_ignore_ascii_case("low_priority") {
                verb.modifier = Some(InsertModifier::LowPriority);
            } else if second.eq_ignore_ascii_case("delayed") {
                verb.modifier = Some(InsertModifier::Delayed);
            } else if second.eq_ignore_ascii_case("ignore") {
                verb.ignore = true;
            }
        }
        if words.get(2).is_some_and(|w| w.eq_ignore_ascii_case("ignore")) {
            verb.ignore = true;
        }
        verb
    }
}

impl From<&str> for InsertVerb {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl fmt::Display for InsertVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.replace { "REPLACE" } else { "INSERT" })?;
        if let Some(modifier) = self.modifier {
            write!(f, " {}", modifier.as_sql())?;
        }
        if self.ignore {
            f.write_str(" IGNORE")?;
        }
        Ok(())
    }
}

impl Builder {
    /// One INSERT statement per row.
    pub fn insert(&self, table: &str, rows: &[Record], verb: InsertVerb) -> SqlResult<Vec<String>> {
        let head = self.insert_head(table, rows, verb)?;
        rows.iter()
            .map(|row| {
                if row.is_empty() {
                    return Err(SqlError::malformed("cannot insert an empty row"));
                }
                let columns: Vec<String> =
                    row.keys().map(|k| quote_column(&self.config, k)).collect();
                let values = row
                    .iter()
                    .map(|(k, v)| quote_value(&self.config, k, v))
                    .collect::<SqlResult<Vec<_>>>()?;
                Ok(format!(
                    "{head} ({}) VALUES ({})",
                    columns.join(", "),
                    values.join(", ")
                ))
            })
            .collect()
    }

    /// [`Builder::insert`] for an [`InsertSpec`].
    pub fn insert_from(&self, spec: &InsertSpec) -> SqlResult<Vec<String>> {
        self.insert(&spec.table, &spec.rows, spec.verb)
    }

    /// [`Builder::multi_insert`] for an [`InsertSpec`].
    pub fn multi_insert_from(&self, spec: &InsertSpec) -> SqlResult<String> {
        self.multi_insert(&spec.table, &spec.rows, spec.verb)
    }

    /// A single multi-row INSERT.
    ///
    /// The column list comes from the first row; every other row must have
    /// exactly the same columns.
    pub fn multi_insert(&self, table: &str, rows: &[Record], verb: InsertVerb) -> SqlResult<String> {
        let head = self.insert_head(table, rows, verb)?;
        let first = &rows[0];
        if first.is_empty() {
            return Err(SqlError::malformed("cannot insert an empty row"));
        }
        let keys: Vec<&str> = first.keys().collect();

        let mut tuples = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.len() != keys.len() {
                return Err(SqlError::malformed(format!(
                    "row {i} has {} columns, expected {}",
                    row.len(),
                    keys.len()
                )));
            }
            let values = keys
                .iter()
                .map(|k| {
                    let v = row.get(k).ok_or_else(|| {
                        SqlError::malformed(format!("row {i} is missing column '{k}'"))
                    })?;
                    quote_value(&self.config, k, v)
                })
                .collect::<SqlResult<Vec<_>>>()?;
            tuples.push(format!("({})", values.join(", ")));
        }

        let columns: Vec<String> = keys.iter().map(|k| quote_column(&self.config, k)).collect();
        Ok(format!(
            "{head} ({}) VALUES {}",
            columns.join(", "),
            tuples.join(", ")
        ))
    }

    /// `INSERT INTO "t"`, after checking rows and dialect support for the verb.
    fn insert_head(&self, table: &str, rows: &[Record], verb: InsertVerb) -> SqlResult<String> {
        let table = self.table(table)?;
        if rows.is_empty() {
            return Err(SqlError::malformed("no rows to insert"));
        }
        if verb.is_extended() && !self.config.dialect.is_mysql() {
            return Err(self.config.dialect.mismatch(verb.to_string()));
        }
        Ok(format!("{verb} INTO {table}"))
    }
}
