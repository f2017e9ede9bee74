//! INSERT, UPDATE and DELETE described as single objects.
//!
//! The JSON forms mirror [`QuerySpec::from_json`](crate::QuerySpec::from_json):
//!
//! ```text
//! {"TABLE": "users", "VALUES": [{"name": "ann"}, {"name": "bob"}]}
//! {"UPDATE": "users", "SET": {"visits[+]": 1}, "WHERE": {"id": 7}}
//! {"FROM": "sessions", "WHERE": {"expires[<]": "2024-01-01"}, "LIMIT": 100}
//! ```
//!
//! The table comes from `TABLE`, then `FROM`, then the statement's own keyword.
//! `GROUP`/`ORDER`/`HAVING`/`LIMIT`/`MATCH` may sit next to `WHERE`.

use crate::builder::InsertVerb;
use crate::clause::{CLAUSE_KEYS, Clauses};
use crate::condition::ConditionMap;
use crate::error::{SqlError, SqlResult};
use crate::value::Record;

type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Rows to insert into one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertSpec {
    pub table: String,
    pub rows: Vec<Record>,
    pub verb: InsertVerb,
}

impl InsertSpec {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn row(mut self, row: Record) -> Self {
        self.rows.push(row);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Record>) -> Self {
        self.rows.extend(rows);
        self
    }

    pub fn verb(mut self, verb: InsertVerb) -> Self {
        self.verb = verb;
        self
    }

    /// Read `{"TABLE"|"FROM"|"INSERT": ..., "VALUES"|"SET": row or [rows]}`.
    ///
    /// The verb is always plain `INSERT`; set another one with [`InsertSpec::verb`].
    pub fn from_json(json: &serde_json::Value) -> SqlResult<Self> {
        let obj = object(json, "insert")?;
        reject_unknown(obj, &["TABLE", "FROM", "INSERT", "VALUES", "SET"], &[])?;

        let rows = match obj.get("VALUES").or_else(|| obj.get("SET")) {
            Some(serde_json::Value::Array(items)) => {
                items.iter().map(Record::from_json).collect::<SqlResult<_>>()?
            }
            Some(row @ serde_json::Value::Object(_)) => vec![Record::from_json(row)?],
            Some(_) => return Err(SqlError::malformed("VALUES must be an object or array")),
            None => return Err(SqlError::malformed("insert has no VALUES")),
        };

        Ok(Self::new(table(obj, "INSERT")?).rows(rows))
    }
}

/// Assignments plus the clauses selecting the rows to change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSpec {
    pub table: String,
    pub set: Record,
    pub clauses: Clauses,
}

impl UpdateSpec {
    pub fn new(table: impl Into<String>, set: Record) -> Self {
        Self {
            table: table.into(),
            set,
            clauses: Clauses::default(),
        }
    }

    pub fn conditions(mut self, conditions: ConditionMap) -> Self {
        self.clauses.conditions = conditions;
        self
    }

    pub fn clauses(mut self, clauses: Clauses) -> Self {
        self.clauses = clauses;
        self
    }

    /// Read `{"TABLE"|"FROM"|"UPDATE": ..., "SET"|"VALUES": {...}, "WHERE": {...}}`.
    pub fn from_json(json: &serde_json::Value) -> SqlResult<Self> {
        let obj = object(json, "update")?;
        reject_unknown(obj, &["TABLE", "FROM", "UPDATE", "SET", "VALUES", "WHERE"], &CLAUSE_KEYS)?;

        let set = obj
            .get("SET")
            .or_else(|| obj.get("VALUES"))
            .ok_or_else(|| SqlError::malformed("update has no SET"))?;
        Ok(Self::new(table(obj, "UPDATE")?, Record::from_json(set)?)
            .clauses(trailing_clauses(obj)?))
    }
}

/// The clauses selecting the rows to delete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteSpec {
    pub table: String,
    pub clauses: Clauses,
}

impl DeleteSpec {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            clauses: Clauses::default(),
        }
    }

    pub fn conditions(mut self, conditions: ConditionMap) -> Self {
        self.clauses.conditions = conditions;
        self
    }

    pub fn clauses(mut self, clauses: Clauses) -> Self {
        self.clauses = clauses;
        self
    }

    /// Read `{"TABLE"|"FROM"|"DELETE": ..., "WHERE": {...}}`.
    pub fn from_json(json: &serde_json::Value) -> SqlResult<Self> {
        let obj = object(json, "delete")?;
        reject_unknown(obj, &["TABLE", "FROM", "DELETE", "WHERE"], &CLAUSE_KEYS)?;
        Ok(Self::new(table(obj, "DELETE")?).clauses(trailing_clauses(obj)?))
    }
}

fn object<'a>(json: &'a serde_json::Value, what: &str) -> SqlResult<&'a JsonObject> {
    json.as_object()
        .ok_or_else(|| SqlError::malformed(format!("{what} spec must be a JSON object")))
}

fn reject_unknown(obj: &JsonObject, keys: &[&str], clause_keys: &[&str]) -> SqlResult<()> {
    match obj
        .keys()
        .find(|k| !keys.contains(&k.as_str()) && !clause_keys.contains(&k.as_str()))
    {
        Some(unknown) => Err(SqlError::malformed(format!("unknown key '{unknown}'"))),
        None => Ok(()),
    }
}

fn table<'a>(obj: &'a JsonObject, keyword: &str) -> SqlResult<&'a str> {
    ["TABLE", "FROM", keyword]
        .iter()
        .find_map(|k| obj.get(*k))
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| SqlError::malformed(format!("{} spec has no table", keyword.to_lowercase())))
}

/// `WHERE` plus any clause keys beside it; the `WHERE` copy wins.
fn trailing_clauses(obj: &JsonObject) -> SqlResult<Clauses> {
    let mut clauses = match obj.get("WHERE") {
        Some(clauses) => Clauses::from_json(clauses)?,
        None => Clauses::default(),
    };
    clauses.apply_json_clauses(obj)?;
    Ok(clauses)
}
