//! Trailing clauses shared by SELECT, UPDATE and DELETE:
//! WHERE, MATCH, GROUP BY, HAVING, ORDER BY and the dialect's row limit.

use crate::condition::{
    ConditionMap, Conjunctor, Node, compile_conditions, compile_entries, is_bare_group,
};
use crate::config::{Config, Dialect};
use crate::error::{SqlError, SqlResult};
use crate::ident::quote_column;
use crate::quote::{quote_literal, quote_scalar};
use crate::value::Value;
use regex::Regex;
use std::sync::OnceLock;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }

    /// Parse `asc` / `desc`, any case.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(Direction::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(Direction::Desc)
        } else {
            None
        }
    }
}

/// One ORDER BY item.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderItem {
    /// `"col"` with an optional direction.
    Column {
        column: String,
        direction: Option<Direction>,
    },
    /// `FIELD("col", v1,v2)`: order by position in an explicit value list (MySQL).
    Field { column: String, values: Vec<Value> },
}

impl OrderItem {
    pub fn asc(column: impl Into<String>) -> Self {
        Self::Column {
            column: column.into(),
            direction: Some(Direction::Asc),
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::Column {
            column: column.into(),
            direction: Some(Direction::Desc),
        }
    }

    pub fn field<V: Into<Value>>(column: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self::Field {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse `"col"`, `"col DESC"`, `"t.col asc"`.
    pub fn parse(text: &str) -> SqlResult<Self> {
        static ORDER_RE: OnceLock<Regex> = OnceLock::new();
        let re = ORDER_RE.get_or_init(|| {
            Regex::new(r"(?i)^\s*([A-Za-z0-9_\-.]+)(?:\s+(ASC|DESC))?\s*$")
                .expect("invalid built-in order regex")
        });
        let caps = re
            .captures(text)
            .ok_or_else(|| SqlError::malformed(format!("invalid ORDER item '{text}'")))?;
        Ok(Self::Column {
            column: caps[1].to_string(),
            direction: caps.get(2).and_then(|m| Direction::parse(m.as_str())),
        })
    }

    fn to_sql(&self, config: &Config) -> SqlResult<String> {
        match self {
            OrderItem::Column { column, direction } => {
                let col = quote_column(config, column);
                Ok(match direction {
                    Some(d) => format!("{col} {}", d.as_sql()),
                    None => col,
                })
            }
            OrderItem::Field { column, values } => {
                if !config.dialect.is_mysql() {
                    return Err(config.dialect.mismatch("ORDER BY FIELD()"));
                }
                if values.is_empty() || values.iter().any(|v| matches!(v, Value::List(_))) {
                    return Err(SqlError::malformed(format!(
                        "ORDER BY FIELD() on '{column}' needs a flat, non-empty value list"
                    )));
                }
                let vals = values
                    .iter()
                    .map(|v| quote_scalar(config, v))
                    .collect::<SqlResult<Vec<_>>>()?;
                Ok(format!("FIELD({}, {})", quote_column(config, column), vals.join(",")))
            }
        }
    }
}

/// ORDER BY items, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn new(items: Vec<OrderItem>) -> Self {
        Self { items }
    }

    /// Parse a single `"col DESC"` string.
    pub fn parse(text: &str) -> SqlResult<Self> {
        Ok(Self::new(vec![OrderItem::parse(text)?]))
    }

    /// `"col DESC"`, `["a", "b DESC"]` or `{"a": "ASC", "b": [3, 1, 2]}`.
    pub fn from_json(json: &serde_json::Value) -> SqlResult<Self> {
        match json {
            serde_json::Value::String(s) => Self::parse(s),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| match item.as_str() {
                    Some(s) => OrderItem::parse(s),
                    None => Err(SqlError::malformed("ORDER list items must be strings")),
                })
                .collect::<SqlResult<Vec<_>>>()
                .map(Self::new),
            serde_json::Value::Object(map) => map
                .iter()
                .map(|(column, v)| match v {
                    serde_json::Value::String(s) => {
                        let direction = Direction::parse(s).ok_or_else(|| {
                            SqlError::malformed(format!("invalid direction '{s}' for '{column}'"))
                        })?;
                        Ok(OrderItem::Column {
                            column: column.clone(),
                            direction: Some(direction),
                        })
                    }
                    serde_json::Value::Array(items) => Ok(OrderItem::Field {
                        column: column.clone(),
                        values: items.iter().map(Value::from_json).collect::<SqlResult<_>>()?,
                    }),
                    _ => Err(SqlError::malformed(format!(
                        "invalid ORDER value for '{column}'"
                    ))),
                })
                .collect::<SqlResult<Vec<_>>>()
                .map(Self::new),
            _ => Err(SqlError::malformed("ORDER must be a string, array or object")),
        }
    }

    fn to_sql(&self, config: &Config) -> SqlResult<String> {
        if self.items.is_empty() {
            return Err(SqlError::malformed("ORDER has no items"));
        }
        let items = self
            .items
            .iter()
            .map(|item| item.to_sql(config))
            .collect::<SqlResult<Vec<_>>>()?;
        Ok(items.join(","))
    }
}

impl From<OrderItem> for Order {
    fn from(item: OrderItem) -> Self {
        Self::new(vec![item])
    }
}

impl From<Vec<OrderItem>> for Order {
    fn from(items: Vec<OrderItem>) -> Self {
        Self::new(items)
    }
}

/// Row limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(u64),
    Range { offset: u64, count: u64 },
}

impl Limit {
    /// `10`, `"10"` or `[offset, count]`.
    pub fn from_json(json: &serde_json::Value) -> SqlResult<Self> {
        let number = |v: &serde_json::Value| match v {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        if let Some(count) = number(json) {
            return Ok(Limit::Count(count));
        }
        if let Some([offset, count]) = json.as_array().map(Vec::as_slice)
            && let (Some(offset), Some(count)) = (number(offset), number(count))
        {
            return Ok(Limit::Range { offset, count });
        }
        Err(SqlError::malformed(format!("invalid LIMIT {json}")))
    }

    /// Render the limit clause for `dialect`, with a leading space.
    ///
    /// MSSQL's `OFFSET ... FETCH` is only valid after ORDER BY.
    pub fn to_sql(&self, dialect: Dialect, ordered: bool) -> SqlResult<String> {
        match (dialect, *self) {
            (Dialect::Mysql | Dialect::Sqlite, Limit::Count(n))
            | (Dialect::Postgres, Limit::Count(n)) => Ok(format!(" LIMIT {n}")),
            (Dialect::Mysql | Dialect::Sqlite, Limit::Range { offset, count }) => {
                Ok(format!(" LIMIT {offset},{count}"))
            }
            (Dialect::Postgres, Limit::Range { offset, count }) => {
                Ok(format!(" OFFSET {offset} LIMIT {count}"))
            }
            (Dialect::Oracle, Limit::Count(n)) => Ok(format!(" FETCH FIRST {n} ROWS ONLY")),
            (Dialect::Oracle, Limit::Range { offset, count }) => Ok(format!(
                " OFFSET {offset} ROWS FETCH NEXT {count} ROWS ONLY"
            )),
            (Dialect::Mssql, _) if !ordered => Err(dialect.mismatch("LIMIT without ORDER BY")),
            (Dialect::Mssql, Limit::Count(n)) => {
                Ok(format!(" OFFSET 0 ROWS FETCH NEXT {n} ROWS ONLY"))
            }
            (Dialect::Mssql, Limit::Range { offset, count }) => Ok(format!(
                " OFFSET {offset} ROWS FETCH NEXT {count} ROWS ONLY"
            )),
            (Dialect::Sybase, _) => Err(dialect.mismatch("LIMIT")),
        }
    }
}

/// Full-text `MATCH (...) AGAINST (...)` predicate (MySQL).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullText {
    pub columns: Vec<String>,
    pub keyword: String,
}

impl FullText {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>, keyword: impl Into<String>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            keyword: keyword.into(),
        }
    }

    /// `{"columns": ["a", "b"], "keyword": "text"}`.
    pub fn from_json(json: &serde_json::Value) -> SqlResult<Self> {
        let columns = json
            .get("columns")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| SqlError::malformed("MATCH needs a 'columns' array"))?;
        let keyword = json
            .get("keyword")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| SqlError::malformed("MATCH needs a 'keyword' string"))?;
        let columns = columns
            .iter()
            .map(|c| {
                c.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| SqlError::malformed("MATCH columns must be strings"))
            })
            .collect::<SqlResult<Vec<_>>>()?;
        Ok(Self::new(columns, keyword))
    }

    fn to_sql(&self, config: &Config) -> SqlResult<String> {
        if !config.dialect.is_mysql() {
            return Err(config.dialect.mismatch("MATCH ... AGAINST"));
        }
        if self.columns.is_empty() {
            return Err(SqlError::malformed("MATCH has no columns"));
        }
        let cols: Vec<String> = self.columns.iter().map(|c| quote_column(config, c)).collect();
        Ok(format!(
            "MATCH ({}) AGAINST ({})",
            cols.join(", "),
            quote_literal(config.dialect, &self.keyword)
        ))
    }
}

/// Everything that can follow the table expression of a statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clauses {
    pub conditions: ConditionMap,
    pub full_text: Option<FullText>,
    pub group: Vec<String>,
    pub having: Option<ConditionMap>,
    pub order: Option<Order>,
    pub limit: Option<Limit>,
}

/// Keys of a JSON where-object that are clauses rather than conditions.
pub(crate) const CLAUSE_KEYS: [&str; 5] = ["GROUP", "ORDER", "HAVING", "LIMIT", "MATCH"];

impl Clauses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conditions(mut self, conditions: ConditionMap) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn full_text(mut self, full_text: FullText) -> Self {
        self.full_text = Some(full_text);
        self
    }

    pub fn group_by<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.group = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn having(mut self, having: ConditionMap) -> Self {
        self.having = Some(having);
        self
    }

    pub fn order_by(mut self, order: impl Into<Order>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Parse a where-object: condition keys plus optional GROUP, ORDER, HAVING,
    /// LIMIT and MATCH.
    pub fn from_json(json: &serde_json::Value) -> SqlResult<Self> {
        let obj = json
            .as_object()
            .ok_or_else(|| SqlError::malformed("WHERE must be a JSON object"))?;

        let conditions: serde_json::Map<String, serde_json::Value> = obj
            .iter()
            .filter(|(k, _)| !CLAUSE_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let mut clauses = Self::new()
            .conditions(ConditionMap::from_json(&serde_json::Value::Object(conditions))?);
        clauses.apply_json_clauses(obj)?;
        Ok(clauses)
    }

    /// Fill GROUP / ORDER / HAVING / LIMIT / MATCH from `obj`, keeping values
    /// that are already set.
    pub(crate) fn apply_json_clauses(
        &mut self,
        obj: &serde_json::Map<String, serde_json::Value>,
    ) -> SqlResult<()> {
        if self.group.is_empty()
            && let Some(group) = obj.get("GROUP")
        {
            self.group = match group {
                serde_json::Value::String(s) => vec![s.clone()],
                serde_json::Value::Array(items) => items
                    .iter()
                    .map(|v| {
                        v.as_str()
                            .map(str::to_string)
                            .ok_or_else(|| SqlError::malformed("GROUP items must be strings"))
                    })
                    .collect::<SqlResult<_>>()?,
                _ => return Err(SqlError::malformed("GROUP must be a string or array")),
            };
        }
        if self.order.is_none()
            && let Some(order) = obj.get("ORDER")
        {
            self.order = Some(Order::from_json(order)?);
        }
        if self.having.is_none()
            && let Some(having) = obj.get("HAVING")
        {
            self.having = Some(ConditionMap::from_json(having)?);
        }
        if self.limit.is_none()
            && let Some(limit) = obj.get("LIMIT")
        {
            self.limit = Some(Limit::from_json(limit)?);
        }
        if self.full_text.is_none()
            && let Some(m) = obj.get("MATCH")
        {
            self.full_text = Some(FullText::from_json(m)?);
        }
        Ok(())
    }

    /// Render all clauses, each with a leading space.
    pub fn to_sql(&self, config: &Config) -> SqlResult<String> {
        let mut out = String::new();

        let mut filter = predicate(config, &self.conditions)?;
        if let Some(full_text) = &self.full_text {
            let m = full_text.to_sql(config)?;
            filter = if filter.is_empty() {
                m
            } else {
                format!("{filter} AND {m}")
            };
        }
        if !filter.is_empty() {
            out.push_str(" WHERE ");
            out.push_str(&filter);
        }

        if !self.group.is_empty() {
            let cols: Vec<String> = self.group.iter().map(|c| quote_column(config, c)).collect();
            out.push_str(" GROUP BY ");
            out.push_str(&cols.join(", "));
        }

        if let Some(having) = &self.having {
            let text = predicate(config, having)?;
            if !text.is_empty() {
                out.push_str(" HAVING ");
                out.push_str(&text);
            }
        }

        if let Some(order) = &self.order {
            out.push_str(" ORDER BY ");
            out.push_str(&order.to_sql(config)?);
        }

        if let Some(limit) = &self.limit {
            out.push_str(&limit.to_sql(config.dialect, self.order.is_some())?);
        }

        Ok(out)
    }
}

impl From<ConditionMap> for Clauses {
    fn from(conditions: ConditionMap) -> Self {
        Self::new().conditions(conditions)
    }
}

/// Compile a top-level condition map.
///
/// Loose conditions are ANDed. A bare top-level `AND` group replaces them, and a
/// bare `OR` group replaces both. The chosen group is not wrapped in parentheses.
pub fn predicate(config: &Config, map: &ConditionMap) -> SqlResult<String> {
    for conjunctor in [Conjunctor::Or, Conjunctor::And] {
        if let Some(node) = map.bare_group(conjunctor) {
            return top_level_group(config, node, conjunctor);
        }
    }
    compile_entries(
        config,
        map.iter().filter(|(k, node)| !is_bare_group(k, node, None)),
        Conjunctor::And,
    )
}

fn top_level_group(config: &Config, node: &Node, conjunctor: Conjunctor) -> SqlResult<String> {
    match node {
        Node::Map(inner) if !inner.is_empty() => compile_conditions(config, inner, conjunctor),
        Node::List(siblings) if !siblings.is_empty() => {
            let parts = siblings
                .iter()
                .map(|s| Ok(format!("({})", compile_conditions(config, s, conjunctor)?)))
                .collect::<SqlResult<Vec<_>>>()?;
            // WHERE and HAVING sit at AND level
            Ok(parts.join(Conjunctor::And.separator()))
        }
        _ => Err(SqlError::malformed(format!(
            "empty top-level {} group",
            conjunctor.keyword()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cfg(dialect: Dialect) -> Config {
        Config::new(dialect)
    }

    #[test]
    fn where_and_group_replacement() {
        let c = cfg(Dialect::Postgres);
        let map = ConditionMap::new().with("a", 1).with("b", 2);
        assert_eq!(predicate(&c, &map).unwrap(), r#""a" = 1 AND "b" = 2"#);

        let map = ConditionMap::new()
            .with("ignored", 1)
            .group("AND", ConditionMap::new().with("x", 1).with("y", 2));
        assert_eq!(predicate(&c, &map).unwrap(), r#""x" = 1 AND "y" = 2"#);

        let map = ConditionMap::new()
            .group("AND", ConditionMap::new().with("x", 1))
            .group("OR", ConditionMap::new().with("x", 1).with("y", 2));
        assert_eq!(predicate(&c, &map).unwrap(), r#""x" = 1 OR "y" = 2"#);
    }

    #[test]
    fn top_level_sibling_lists_join_with_and() {
        let c = cfg(Dialect::Postgres);
        let map = ConditionMap::new().groups(
            "OR",
            vec![
                ConditionMap::new().with("a", 1).with("b", 2),
                ConditionMap::new().with("c", 3).with("d", 4),
            ],
        );
        assert_eq!(
            predicate(&c, &map).unwrap(),
            r#"("a" = 1 OR "b" = 2) AND ("c" = 3 OR "d" = 4)"#
        );

        let nested = compile_conditions(&c, &map, Conjunctor::And).unwrap();
        assert_eq!(nested, format!("({})", predicate(&c, &map).unwrap()));
    }

    #[test]
    fn group_keys_without_groups_are_malformed() {
        let c = cfg(Dialect::Postgres);
        let map = ConditionMap::new().with("OR", vec![1, 2]);
        assert!(predicate(&c, &map).unwrap_err().is_malformed());
        let map = ConditionMap::new().with("a", 1).with("AND", "x");
        assert!(predicate(&c, &map).unwrap_err().is_malformed());

        let map = ConditionMap::from_json(&json!({"OR": []})).unwrap();
        assert!(predicate(&c, &map).unwrap_err().is_malformed());
        let map = ConditionMap::from_json(&json!({"a": 1, "OR #x": []})).unwrap();
        assert!(predicate(&c, &map).unwrap_err().is_malformed());
    }

    #[test]
    fn commented_groups_stay_loose() {
        let c = cfg(Dialect::Postgres);
        let map = ConditionMap::new()
            .with("a", 1)
            .group("OR #x", ConditionMap::new().with("b", 2).with("c", 3));
        assert_eq!(
            predicate(&c, &map).unwrap(),
            r#""a" = 1 AND ("b" = 2 OR "c" = 3)"#
        );
    }

    #[test]
    fn order_parsing() {
        assert_eq!(
            OrderItem::parse("id").unwrap(),
            OrderItem::Column {
                column: "id".into(),
                direction: None
            }
        );
        assert_eq!(OrderItem::parse("t.id desc").unwrap(), OrderItem::desc("t.id"));
        assert!(OrderItem::parse("id; DROP").unwrap_err().is_malformed());
        assert!(OrderItem::parse("").unwrap_err().is_malformed());
    }

    #[test]
    fn order_rendering() {
        let c = cfg(Dialect::Mysql);
        let clauses = Clauses::new().order_by(vec![
            OrderItem::desc("age"),
            OrderItem::field("status", ["b", "a"]),
        ]);
        assert_eq!(
            clauses.to_sql(&c).unwrap(),
            r#" ORDER BY "age" DESC,FIELD("status", 'b','a')"#
        );

        let err = clauses.to_sql(&cfg(Dialect::Postgres)).unwrap_err();
        assert!(err.is_dialect_mismatch());
    }

    #[test]
    fn order_from_json() {
        let order = Order::from_json(&json!({"a": "asc", "b": [1, 2]})).unwrap();
        assert_eq!(
            order.items,
            vec![OrderItem::asc("a"), OrderItem::field("b", [1, 2])]
        );
        assert!(Order::from_json(&json!({"a": 1})).unwrap_err().is_malformed());
        assert_eq!(Order::from_json(&json!(["a", "b DESC"])).unwrap().items.len(), 2);
    }

    #[test]
    fn limits_per_dialect() {
        let range = Limit::Range { offset: 10, count: 20 };
        assert_eq!(range.to_sql(Dialect::Mysql, false).unwrap(), " LIMIT 10,20");
        assert_eq!(range.to_sql(Dialect::Sqlite, false).unwrap(), " LIMIT 10,20");
        assert_eq!(range.to_sql(Dialect::Postgres, false).unwrap(), " OFFSET 10 LIMIT 20");
        assert_eq!(
            range.to_sql(Dialect::Oracle, false).unwrap(),
            " OFFSET 10 ROWS FETCH NEXT 20 ROWS ONLY"
        );
        assert_eq!(
            range.to_sql(Dialect::Mssql, true).unwrap(),
            " OFFSET 10 ROWS FETCH NEXT 20 ROWS ONLY"
        );
        assert!(range.to_sql(Dialect::Mssql, false).unwrap_err().is_dialect_mismatch());
        assert!(range.to_sql(Dialect::Sybase, true).unwrap_err().is_dialect_mismatch());

        let count = Limit::Count(5);
        assert_eq!(count.to_sql(Dialect::Postgres, false).unwrap(), " LIMIT 5");
        assert_eq!(count.to_sql(Dialect::Oracle, false).unwrap(), " FETCH FIRST 5 ROWS ONLY");
        assert_eq!(
            count.to_sql(Dialect::Mssql, true).unwrap(),
            " OFFSET 0 ROWS FETCH NEXT 5 ROWS ONLY"
        );
    }

    #[test]
    fn limit_from_json() {
        assert_eq!(Limit::from_json(&json!(3)).unwrap(), Limit::Count(3));
        assert_eq!(Limit::from_json(&json!("3")).unwrap(), Limit::Count(3));
        assert_eq!(
            Limit::from_json(&json!([5, 10])).unwrap(),
            Limit::Range { offset: 5, count: 10 }
        );
        assert!(Limit::from_json(&json!([5])).unwrap_err().is_malformed());
        assert!(Limit::from_json(&json!(-1)).unwrap_err().is_malformed());
    }

    #[test]
    fn full_text_match() {
        let c = cfg(Dialect::Mysql);
        let clauses = Clauses::from(ConditionMap::new().with("a", 1))
            .full_text(FullText::new(["title", "body"], "rust"));
        assert_eq!(
            clauses.to_sql(&c).unwrap(),
            r#" WHERE "a" = 1 AND MATCH ("title", "body") AGAINST ('rust')"#
        );

        let only = Clauses::new().full_text(FullText::new(["title"], "it's"));
        assert_eq!(
            only.to_sql(&c).unwrap(),
            r#" WHERE MATCH ("title") AGAINST ('it''s')"#
        );
        assert!(only.to_sql(&cfg(Dialect::Sqlite)).unwrap_err().is_dialect_mismatch());
    }

    #[test]
    fn full_clause_order() {
        let c = cfg(Dialect::Postgres);
        let clauses = Clauses::from(ConditionMap::new().with("active", true))
            .group_by(["dept", "role"])
            .having(ConditionMap::new().with("#total[>]", 10))
            .order_by(OrderItem::desc("dept"))
            .limit(Limit::Count(5));
        assert_eq!(
            clauses.to_sql(&c).unwrap(),
            r#" WHERE "active" = 1 GROUP BY "dept", "role" HAVING "total" > 10 ORDER BY "dept" DESC LIMIT 5"#
        );
    }

    #[test]
    fn from_json_splits_clause_keys() {
        let clauses = Clauses::from_json(&json!({
            "id[>]": 3,
            "ORDER": "id DESC",
            "LIMIT": [0, 5],
            "GROUP": "kind"
        }))
        .unwrap();
        assert_eq!(clauses.conditions, ConditionMap::new().with("id[>]", 3));
        assert_eq!(clauses.order, Some(Order::from(OrderItem::desc("id"))));
        assert_eq!(clauses.limit, Some(Limit::Range { offset: 0, count: 5 }));
        assert_eq!(clauses.group, vec!["kind".to_string()]);
    }

    #[test]
    fn empty_clauses_render_nothing() {
        assert_eq!(Clauses::new().to_sql(&cfg(Dialect::Mysql)).unwrap(), "");
    }
}
