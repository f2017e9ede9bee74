//! The description of a SELECT: table, projection, joins and trailing clauses.
//!
//! A [`QuerySpec`] is built fluently or read from a JSON object using upper-case
//! keys (`TABLE`/`FROM`/`SELECT`, `COLUMNS`, `JOIN`, `WHERE`, `GROUP`, `ORDER`,
//! `HAVING`, `LIMIT`, `MATCH`, `FUN`).
//!
//! # Example
//! ```ignore
//! use keysql::prelude::*;
//!
//! let spec = QuerySpec::new("users(u)")
//!     .columns(["u.id", "u.name(username)"])
//!     .join(Join::left("roles(r)", JoinOn::on([("u.role_id", "id")])))
//!     .conditions(ConditionMap::new().with("u.active", true))
//!     .order_by(OrderItem::desc("u.id"))
//!     .limit(Limit::Count(20));
//! ```

use crate::clause::{CLAUSE_KEYS, Clauses, FullText, Limit, Order};
use crate::condition::ConditionMap;
use crate::error::{SqlError, SqlResult};
use crate::ident::split_alias;
use std::fmt;

/// Aggregate function wrapping a column or the whole projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregate {
    Count,
    Max,
    Min,
    Sum,
    Avg,
    Round,
}

impl Aggregate {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Aggregate::Count => "COUNT",
            Aggregate::Max => "MAX",
            Aggregate::Min => "MIN",
            Aggregate::Sum => "SUM",
            Aggregate::Avg => "AVG",
            Aggregate::Round => "ROUND",
        }
    }

    /// Parse an aggregate name, any case.
    pub fn parse(s: &str) -> Option<Self> {
        [
            Aggregate::Count,
            Aggregate::Max,
            Aggregate::Min,
            Aggregate::Sum,
            Aggregate::Avg,
            Aggregate::Round,
        ]
        .into_iter()
        .find(|a| a.as_sql().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A projected column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub alias: Option<String>,
    pub aggregate: Option<Aggregate>,
}

impl Column {
    /// Parse `col` or `col(alias)`.
    pub fn parse(text: &str) -> Self {
        match split_alias(text) {
            Some((name, alias)) => Self {
                name: name.to_string(),
                alias: Some(alias.to_string()),
                aggregate: None,
            },
            None => Self {
                name: text.trim().to_string(),
                alias: None,
                aggregate: None,
            },
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = Some(aggregate);
        self
    }
}

impl From<&str> for Column {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<String> for Column {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

/// The projection of a SELECT.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Columns {
    #[default]
    All,
    List(Vec<Column>),
}

impl Columns {
    /// `"*"`, `"col(alias)"`, `["a", {"COUNT": "id(total)"}]` or `{"MAX": "age"}`.
    pub fn from_json(json: &serde_json::Value) -> SqlResult<Self> {
        match json {
            serde_json::Value::String(s) if s.trim() == "*" => Ok(Columns::All),
            serde_json::Value::String(s) => Ok(Columns::List(vec![Column::parse(s)])),
            serde_json::Value::Array(items) => {
                let mut columns = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        serde_json::Value::String(s) => columns.push(Column::parse(s)),
                        serde_json::Value::Object(_) => columns.extend(aggregate_columns(item)?),
                        _ => return Err(SqlError::malformed("column entries must be strings")),
                    }
                }
                Ok(Columns::List(columns))
            }
            serde_json::Value::Object(_) => Ok(Columns::List(aggregate_columns(json)?)),
            _ => Err(SqlError::malformed("COLUMNS must be a string, array or object")),
        }
    }
}

fn aggregate_columns(json: &serde_json::Value) -> SqlResult<Vec<Column>> {
    let obj = json
        .as_object()
        .ok_or_else(|| SqlError::malformed("aggregate columns must be an object"))?;
    obj.iter()
        .map(|(name, value)| {
            let aggregate = Aggregate::parse(name)
                .ok_or_else(|| SqlError::malformed(format!("unknown aggregate '{name}'")))?;
            let text = value.as_str().ok_or_else(|| {
                SqlError::malformed(format!("{aggregate} column must be a string"))
            })?;
            Ok(Column::parse(text).aggregate(aggregate))
        })
        .collect()
}

/// Join type, written as the bracketed prefix of a join key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `[>]`
    Left,
    /// `[<]`
    Right,
    /// `[<>]`
    Full,
    /// `[><]`
    Inner,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Inner => "INNER JOIN",
        }
    }

    fn from_sign(sign: &str) -> Option<Self> {
        match sign {
            ">" => Some(JoinKind::Left),
            "<" => Some(JoinKind::Right),
            "<>" => Some(JoinKind::Full),
            "><" => Some(JoinKind::Inner),
            _ => None,
        }
    }
}

/// How a joined table relates to the rest of the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOn {
    /// `USING ("a", "b")`
    Using(Vec<String>),
    /// `ON left = right AND ...`; the left side names the main table (or a dotted
    /// table), the right side a column of the joined table.
    On(Vec<(String, String)>),
}

impl JoinOn {
    pub fn using<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        JoinOn::Using(columns.into_iter().map(Into::into).collect())
    }

    pub fn on<L: Into<String>, R: Into<String>>(pairs: impl IntoIterator<Item = (L, R)>) -> Self {
        JoinOn::On(pairs.into_iter().map(|(l, r)| (l.into(), r.into())).collect())
    }

    /// `"id"`, `["a", "b"]` or `{"user_id": "id"}`.
    pub fn from_json(json: &serde_json::Value) -> SqlResult<Self> {
        let text = |v: &serde_json::Value| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| SqlError::malformed("join columns must be strings"))
        };
        match json {
            serde_json::Value::String(s) => Ok(JoinOn::Using(vec![s.clone()])),
            serde_json::Value::Array(items) => {
                Ok(JoinOn::Using(items.iter().map(text).collect::<SqlResult<_>>()?))
            }
            serde_json::Value::Object(map) => Ok(JoinOn::On(
                map.iter()
                    .map(|(k, v)| Ok((k.clone(), text(v)?)))
                    .collect::<SqlResult<_>>()?,
            )),
            _ => Err(SqlError::malformed("join relation must be a string, array or object")),
        }
    }
}

/// A joined table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub alias: Option<String>,
    pub relation: JoinOn,
}

impl Join {
    /// `table` may carry an alias: `roles(r)`.
    pub fn new(kind: JoinKind, table: &str, relation: JoinOn) -> Self {
        let (table, alias) = match split_alias(table) {
            Some((t, a)) => (t.to_string(), Some(a.to_string())),
            None => (table.trim().to_string(), None),
        };
        Self {
            kind,
            table,
            alias,
            relation,
        }
    }

    pub fn left(table: &str, relation: JoinOn) -> Self {
        Self::new(JoinKind::Left, table, relation)
    }

    pub fn right(table: &str, relation: JoinOn) -> Self {
        Self::new(JoinKind::Right, table, relation)
    }

    pub fn full(table: &str, relation: JoinOn) -> Self {
        Self::new(JoinKind::Full, table, relation)
    }

    pub fn inner(table: &str, relation: JoinOn) -> Self {
        Self::new(JoinKind::Inner, table, relation)
    }

    /// Parse a join key `[>]table(alias)`.
    pub fn from_key(key: &str, relation: JoinOn) -> SqlResult<Self> {
        let malformed = || SqlError::malformed(format!("invalid join key '{key}'"));
        let rest = key.trim().strip_prefix('[').ok_or_else(malformed)?;
        let (sign, table) = rest.split_once(']').ok_or_else(malformed)?;
        let kind = JoinKind::from_sign(sign).ok_or_else(malformed)?;
        if table.trim().is_empty() {
            return Err(malformed());
        }
        Ok(Self::new(kind, table, relation))
    }

    /// The name other clauses use to refer to this table.
    pub fn reference(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table)
    }
}

/// Function applied to the whole projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fun {
    /// `SELECT f(columns)`
    Aggregate(Aggregate),
    /// `SELECT 1`, used inside `EXISTS(...)`
    Exists,
}

impl Fun {
    /// `"COUNT"`, `"max"`, `1`, `true` or `"EXISTS"`.
    pub fn from_json(json: &serde_json::Value) -> SqlResult<Self> {
        match json {
            serde_json::Value::String(s) if s.eq_ignore_ascii_case("exists") => Ok(Fun::Exists),
            serde_json::Value::String(s) => Aggregate::parse(s)
                .map(Fun::Aggregate)
                .ok_or_else(|| SqlError::malformed(format!("unknown FUN '{s}'"))),
            serde_json::Value::Bool(true) => Ok(Fun::Exists),
            serde_json::Value::Number(n) if n.as_u64() == Some(1) => Ok(Fun::Exists),
            other => Err(SqlError::malformed(format!("invalid FUN {other}"))),
        }
    }
}

/// A declarative SELECT.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    /// Main table, optionally `name(alias)`.
    pub table: String,
    pub columns: Columns,
    pub joins: Vec<Join>,
    pub clauses: Clauses,
    pub fun: Option<Fun>,
}

const SPEC_KEYS: [&str; 7] = ["TABLE", "FROM", "SELECT", "COLUMNS", "JOIN", "WHERE", "FUN"];

impl QuerySpec {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Project these columns instead of `*`.
    pub fn columns<C: Into<Column>>(mut self, columns: impl IntoIterator<Item = C>) -> Self {
        self.columns = Columns::List(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Append one projected column.
    pub fn column(mut self, column: impl Into<Column>) -> Self {
        let column = column.into();
        match &mut self.columns {
            Columns::List(list) => list.push(column),
            all => *all = Columns::List(vec![column]),
        }
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn conditions(mut self, conditions: ConditionMap) -> Self {
        self.clauses.conditions = conditions;
        self
    }

    pub fn clauses(mut self, clauses: Clauses) -> Self {
        self.clauses = clauses;
        self
    }

    pub fn group_by<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.clauses = self.clauses.group_by(columns);
        self
    }

    pub fn having(mut self, having: ConditionMap) -> Self {
        self.clauses = self.clauses.having(having);
        self
    }

    pub fn order_by(mut self, order: impl Into<Order>) -> Self {
        self.clauses = self.clauses.order_by(order);
        self
    }

    pub fn limit(mut self, limit: Limit) -> Self {
        self.clauses = self.clauses.limit(limit);
        self
    }

    pub fn full_text(mut self, full_text: FullText) -> Self {
        self.clauses = self.clauses.full_text(full_text);
        self
    }

    pub fn fun(mut self, fun: Fun) -> Self {
        self.fun = Some(fun);
        self
    }

    /// Read a spec from JSON: either a bare table name or an object.
    ///
    /// The table comes from `TABLE`, then `FROM`, then `SELECT`. When `TABLE` or
    /// `FROM` names the table, `SELECT` may list the columns instead of `COLUMNS`.
    /// `GROUP`/`ORDER`/`HAVING`/`LIMIT`/`MATCH` may sit at the top level or inside
    /// `WHERE`; the `WHERE` copy wins.
    pub fn from_json(json: &serde_json::Value) -> SqlResult<Self> {
        if let Some(table) = json.as_str() {
            return Ok(Self::new(table));
        }
        let obj = json
            .as_object()
            .ok_or_else(|| SqlError::malformed("query spec must be a string or object"))?;

        if let Some(unknown) = obj
            .keys()
            .find(|k| !SPEC_KEYS.contains(&k.as_str()) && !CLAUSE_KEYS.contains(&k.as_str()))
        {
            return Err(SqlError::malformed(format!("unknown query key '{unknown}'")));
        }

        let table = ["TABLE", "FROM", "SELECT"]
            .iter()
            .find_map(|k| obj.get(*k))
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| SqlError::malformed("query spec has no table"))?;
        let mut spec = Self::new(table);

        let has_table = obj.contains_key("TABLE") || obj.contains_key("FROM");
        let columns = obj
            .get("COLUMNS")
            .or_else(|| if has_table { obj.get("SELECT") } else { None });
        if let Some(columns) = columns {
            spec.columns = Columns::from_json(columns)?;
        }

        if let Some(joins) = obj.get("JOIN") {
            let joins = joins
                .as_object()
                .ok_or_else(|| SqlError::malformed("JOIN must be an object"))?;
            for (key, relation) in joins {
                spec.joins.push(Join::from_key(key, JoinOn::from_json(relation)?)?);
            }
        }

        if let Some(clauses) = obj.get("WHERE") {
            spec.clauses = Clauses::from_json(clauses)?;
        }
        spec.clauses.apply_json_clauses(obj)?;

        if let Some(fun) = obj.get("FUN") {
            spec.fun = Some(Fun::from_json(fun)?);
        }

        Ok(spec)
    }
}
