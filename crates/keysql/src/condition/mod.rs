//! Condition trees and their compilation to SQL predicate text.
//!
//! A [`ConditionMap`] is an insertion-ordered map from condition key to [`Node`].
//! Leaf keys use the `column[op]` grammar described in [`key`]; `AND` / `OR` keys
//! introduce nested groups.
//!
//! # Example
//! ```ignore
//! use keysql::condition::ConditionMap;
//!
//! let cond = ConditionMap::new()
//!     .with("status", "active")
//!     .with("age[>=]", 18)
//!     .group("OR", ConditionMap::new().with("role", "admin").with("#score[>]", 90));
//! ```

pub mod key;

pub use key::{ConditionKey, Conjunctor, GroupKey, Operator};

use crate::config::Config;
use crate::error::{SqlError, SqlResult};
use crate::ident::quote_column;
use crate::quote::{quote_fn, quote_scalar, quote_value};
use crate::value::{Value, float_sql};
use indexmap::IndexMap;

/// A node of a condition tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A leaf value.
    Value(Value),
    /// A nested group of conditions.
    Map(ConditionMap),
    /// Sibling groups, each compiled on its own.
    List(Vec<ConditionMap>),
}

impl From<Value> for Node {
    fn from(v: Value) -> Self {
        Node::Value(v)
    }
}

impl From<ConditionMap> for Node {
    fn from(m: ConditionMap) -> Self {
        Node::Map(m)
    }
}

impl From<Vec<ConditionMap>> for Node {
    fn from(list: Vec<ConditionMap>) -> Self {
        Node::List(list)
    }
}

/// Insertion-ordered condition map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionMap {
    entries: IndexMap<String, Node>,
}

impl ConditionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leaf condition.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), Node::Value(value.into()));
        self
    }

    /// Add a nested group under an `AND` / `OR` key.
    pub fn group(mut self, key: impl Into<String>, inner: ConditionMap) -> Self {
        self.entries.insert(key.into(), Node::Map(inner));
        self
    }

    /// Add a list of sibling groups under an `AND` / `OR` key.
    pub fn groups(mut self, key: impl Into<String>, siblings: Vec<ConditionMap>) -> Self {
        self.entries.insert(key.into(), Node::List(siblings));
        self
    }

    /// Insert any node, replacing an existing entry with the same key in place.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) {
        self.entries.insert(key.into(), node.into());
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// First entry keyed by a bare `AND` / `OR` (no comment) holding a group.
    pub(crate) fn bare_group(&self, conjunctor: Conjunctor) -> Option<&Node> {
        self.iter()
            .find(|(k, node)| is_bare_group(k, node, Some(conjunctor)))
            .map(|(_, node)| node)
    }

    /// Build a condition map from a JSON object.
    ///
    /// Objects become nested groups, arrays of objects under a group key become
    /// sibling groups (an empty array is an empty group), everything else becomes
    /// a [`Value`].
    pub fn from_json(json: &serde_json::Value) -> SqlResult<Self> {
        let obj = json
            .as_object()
            .ok_or_else(|| SqlError::malformed("conditions must be a JSON object"))?;

        let mut map = ConditionMap::new();
        for (key, value) in obj {
            let node = match value {
                serde_json::Value::Object(_) => Node::Map(Self::from_json(value)?),
                serde_json::Value::Array(items)
                    if GroupKey::parse(key).is_some()
                        && items.iter().all(serde_json::Value::is_object) =>
                {
                    Node::List(items.iter().map(Self::from_json).collect::<SqlResult<_>>()?)
                }
                _ => Node::Value(Value::from_json(value)?),
            };
            map.entries.insert(key.clone(), node);
        }
        Ok(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ConditionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), Node::Value(v.into())))
                .collect(),
        }
    }
}

/// Compile `map` into predicate text, joining sibling fragments with `conjunctor`.
///
/// An empty map compiles to an empty string.
pub fn compile_conditions(
    config: &Config,
    map: &ConditionMap,
    conjunctor: Conjunctor,
) -> SqlResult<String> {
    compile_entries(config, map.iter(), conjunctor)
}

pub(crate) fn compile_entries<'a>(
    config: &Config,
    entries: impl Iterator<Item = (&'a str, &'a Node)>,
    conjunctor: Conjunctor,
) -> SqlResult<String> {
    let mut fragments = Vec::new();

    for (key, node) in entries {
        let fragment = match (GroupKey::parse(key), node) {
            (Some(group), Node::Map(inner)) => {
                format!("({})", compile_group(config, key, inner, group.conjunctor)?)
            }
            (Some(group), Node::List(siblings)) => {
                if siblings.is_empty() {
                    return Err(SqlError::malformed(format!("empty condition group '{key}'")));
                }
                let parts = siblings
                    .iter()
                    .map(|s| Ok(format!("({})", compile_group(config, key, s, group.conjunctor)?)))
                    .collect::<SqlResult<Vec<_>>>()?;
                format!("({})", parts.join(conjunctor.separator()))
            }
            (Some(_), Node::Value(_)) => {
                return Err(SqlError::malformed(format!(
                    "group key '{key}' must hold a condition map or a list of them"
                )));
            }
            (None, Node::Value(value)) => compile_leaf(config, key, value)?,
            (None, _) => {
                return Err(SqlError::malformed(format!(
                    "nested conditions under non-group key '{key}'"
                )));
            }
        };
        fragments.push(fragment);
    }

    Ok(fragments.join(conjunctor.separator()))
}

/// `true` for a bare `AND` / `OR` key (optionally `AND #`) holding a group.
pub(crate) fn is_bare_group(key: &str, node: &Node, kind: Option<Conjunctor>) -> bool {
    if !matches!(node, Node::Map(_) | Node::List(_)) {
        return false;
    }
    GroupKey::parse(key).is_some_and(|g| {
        g.comment.as_deref().is_none_or(str::is_empty)
            && kind.is_none_or(|k| k == g.conjunctor)
    })
}

fn compile_group(
    config: &Config,
    key: &str,
    inner: &ConditionMap,
    conjunctor: Conjunctor,
) -> SqlResult<String> {
    if inner.is_empty() {
        return Err(SqlError::malformed(format!("empty condition group '{key}'")));
    }
    compile_conditions(config, inner, conjunctor)
}

/// Compile one `key => value` leaf.
pub(crate) fn compile_leaf(config: &Config, key: &str, value: &Value) -> SqlResult<String> {
    let parsed = ConditionKey::parse(key)?;
    let col = quote_column(config, &parsed.column);
    let reject = |op: Option<Operator>| {
        SqlError::unsupported(
            parsed.column.clone(),
            op.map_or_else(|| "=".to_string(), |o| o.to_string()),
            value.tag().as_str(),
        )
    };

    match (parsed.operator, value) {
        (None, Value::Null) => Ok(format!("{col} IS NULL")),
        (Some(Operator::Not), Value::Null) => Ok(format!("{col} IS NOT NULL")),

        (None, Value::List(items)) => in_list(config, &col, items, false)
            .ok_or_else(|| reject(None))?,
        (Some(Operator::Not), Value::List(items)) => in_list(config, &col, items, true)
            .ok_or_else(|| reject(Some(Operator::Not)))?,

        (None, scalar) => Ok(format!("{col} = {}", quote_value(config, key, scalar)?)),
        (Some(Operator::Not), scalar) => {
            Ok(format!("{col} != {}", quote_value(config, key, scalar)?))
        }

        (Some(op @ (Operator::Between | Operator::NotBetween)), Value::List(items)) => {
            let [low, high] = items.as_slice() else {
                return Err(reject(Some(op)));
            };
            let (Some(low), Some(high)) = (bound(config, low), bound(config, high)) else {
                return Err(reject(Some(op)));
            };
            let keyword = if op == Operator::Between {
                "BETWEEN"
            } else {
                "NOT BETWEEN"
            };
            Ok(format!("({col} {keyword} {} AND {})", low?, high?))
        }

        (Some(op @ (Operator::Like | Operator::NotLike)), value) => {
            let items = match value {
                Value::List(items) if !items.is_empty() => items.as_slice(),
                Value::Text(_) | Value::Int(_) | Value::Float(_) => std::slice::from_ref(value),
                _ => return Err(reject(Some(op))),
            };
            let keyword = if op == Operator::Like { "LIKE" } else { "NOT LIKE" };
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                let text = like_text(item).ok_or_else(|| reject(Some(op)))??;
                parts.push(format!(
                    "{col} {keyword} {}",
                    quote_fn(config, key, &like_pattern(&text))
                ));
            }
            Ok(if parts.len() > 1 {
                format!("({})", parts.join(" OR "))
            } else {
                parts.concat()
            })
        }

        (Some(op), Value::Int(_) | Value::Float(_)) if op.comparison().is_some() => {
            let sym = op.comparison().unwrap_or_default();
            let number = value.numeric_sql().ok_or_else(|| reject(Some(op)))??;
            Ok(format!("{col} {sym} {number}"))
        }
        (Some(op), Value::Text(text)) if op.comparison().is_some() => {
            let sym = op.comparison().unwrap_or_default();
            Ok(format!("{col} {sym} {}", quote_fn(config, key, text)))
        }

        (op, _) => Err(reject(op)),
    }
}

/// `col IN (a,b)` / `col NOT IN (a,b)`. `None` if an item is itself a list.
fn in_list(config: &Config, col: &str, items: &[Value], negated: bool) -> Option<SqlResult<String>> {
    if items.is_empty() {
        return Some(Ok(if negated { "1=1" } else { "1=0" }.to_string()));
    }
    if items.iter().any(|v| matches!(v, Value::List(_))) {
        return None;
    }
    let rendered = items
        .iter()
        .map(|v| quote_scalar(config, v))
        .collect::<SqlResult<Vec<_>>>();
    let keyword = if negated { "NOT IN" } else { "IN" };
    Some(rendered.map(|vals| format!("{col} {keyword} ({})", vals.join(","))))
}

/// A BETWEEN bound: numbers and text only.
fn bound(config: &Config, value: &Value) -> Option<SqlResult<String>> {
    match value {
        Value::Int(_) | Value::Float(_) | Value::Text(_) => Some(quote_scalar(config, value)),
        _ => None,
    }
}

/// Text of a LIKE item: text as-is, numbers stringified.
fn like_text(value: &Value) -> Option<SqlResult<String>> {
    match value {
        Value::Text(s) => Some(Ok(s.clone())),
        Value::Int(i) => Some(Ok(i.to_string())),
        Value::Float(f) => Some(float_sql(*f)),
        _ => None,
    }
}

/// Apply the LIKE wildcard heuristics to a bare search term.
///
/// - `abc_` → `abc%` (prefix match)
/// - `abc%` → `%abc` (suffix match)
/// - `abc` → `%abc%`
///
/// Text that already starts with `%`, `[` or `_]`, or ends with `]`, is kept.
pub fn like_pattern(item: &str) -> String {
    if let Some(stem) = item.strip_suffix('_') {
        format!("{stem}%")
    } else if let Some(stem) = item.strip_suffix('%') {
        format!("%{stem}")
    } else if item.is_empty()
        || item.starts_with(['%', '['])
        || item.starts_with("_]")
        || item.ends_with(']')
    {
        item.to_string()
    } else {
        format!("%{item}%")
    }
}
