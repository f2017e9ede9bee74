//! Tagged values carried by conditions and row data.
//!
//! The tag of a [`Value`] decides which SQL a condition compiles to when no operator
//! suffix is given: `Null` becomes `IS NULL`, `List` becomes `IN (...)`, anything else `=`.

use crate::error::{SqlError, SqlResult};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
}

/// The variant of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTag {
    Null,
    Bool,
    Int,
    Float,
    Text,
    List,
}

impl ValueTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueTag::Null => "null",
            ValueTag::Bool => "bool",
            ValueTag::Int => "int",
            ValueTag::Float => "float",
            ValueTag::Text => "text",
            ValueTag::List => "list",
        }
    }
}

impl fmt::Display for ValueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// The tag of this value.
    pub fn tag(&self) -> ValueTag {
        match self {
            Value::Null => ValueTag::Null,
            Value::Bool(_) => ValueTag::Bool,
            Value::Int(_) => ValueTag::Int,
            Value::Float(_) => ValueTag::Float,
            Value::Text(_) => ValueTag::Text,
            Value::List(_) => ValueTag::List,
        }
    }

    /// `true` for `Int` and `Float`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Render a numeric value as unquoted SQL text. `None` for non-numeric values.
    pub fn numeric_sql(&self) -> Option<SqlResult<String>> {
        match self {
            Value::Int(i) => Some(Ok(i.to_string())),
            Value::Float(f) => Some(float_sql(*f)),
            _ => None,
        }
    }

    /// Integer reading of a scalar. Text is parsed, floats are truncated.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.is_finite() => Some(*f as i64),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Text(s) => {
                let s = s.trim();
                s.parse()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
            }
            _ => None,
        }
    }

    /// Float reading of a scalar. Text is parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Truth reading of a scalar: non-zero numbers, `true`, and the texts
    /// `1` / `t` / `true` (any case).
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            Value::Float(f) => Some(*f != 0.0),
            Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "t" | "true" => Some(true),
                "0" | "f" | "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Convert a JSON value. Objects are not values and are rejected.
    pub fn from_json(json: &serde_json::Value) -> SqlResult<Self> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(Value::from_json).collect::<SqlResult<_>>()?)
            }
            serde_json::Value::Object(_) => {
                return Err(SqlError::malformed(
                    "a JSON object cannot be used as a value",
                ));
            }
        })
    }
}

/// Render a float as unquoted SQL. NaN and infinities have no literal form.
pub(crate) fn float_sql(f: f64) -> SqlResult<String> {
    if f.is_finite() {
        Ok(f.to_string())
    } else {
        Err(SqlError::InvalidValue(format!(
            "non-finite float {f} has no SQL literal"
        )))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Value {
    fn from(v: &[T]) -> Self {
        Value::List(v.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<chrono::NaiveDate> for Value {
    fn from(v: chrono::NaiveDate) -> Self {
        Value::Text(v.format("%Y-%m-%d").to_string())
    }
}

impl From<chrono::NaiveDateTime> for Value {
    fn from(v: chrono::NaiveDateTime) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<chrono::DateTime<chrono::Utc>> for Value {
    fn from(v: chrono::DateTime<chrono::Utc>) -> Self {
        Value::Text(v.naive_utc().to_string())
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Text(v.hyphenated().to_string())
    }
}

/// One row of column values for INSERT or UPDATE, in insertion order.
///
/// Keys may carry the raw marker (`#created`) and, for UPDATE, an arithmetic
/// suffix (`hits[+]`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, keeping the position of an existing key.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Read a record from a JSON object.
    pub fn from_json(json: &serde_json::Value) -> SqlResult<Self> {
        let obj = json
            .as_object()
            .ok_or_else(|| SqlError::malformed("a record must be a JSON object"))?;
        obj.iter()
            .map(|(k, v)| Ok((k.clone(), Value::from_json(v)?)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tags() {
        assert_eq!(Value::Null.tag(), ValueTag::Null);
        assert_eq!(Value::from(3i32).tag(), ValueTag::Int);
        assert_eq!(Value::from(1.5).tag(), ValueTag::Float);
        assert_eq!(Value::from("a").tag(), ValueTag::Text);
        assert_eq!(Value::from(vec![1, 2]).tag(), ValueTag::List);
        assert_eq!(Value::from(None::<i32>).tag(), ValueTag::Null);
    }

    #[test]
    fn numeric_sql() {
        assert_eq!(Value::Int(-4).numeric_sql().unwrap().unwrap(), "-4");
        assert_eq!(Value::Float(2.5).numeric_sql().unwrap().unwrap(), "2.5");
        assert!(Value::Float(f64::NAN).numeric_sql().unwrap().is_err());
        assert!(Value::from("1").numeric_sql().is_none());
    }

    #[test]
    fn from_json() {
        let v = Value::from_json(&json!([1, 2.5, "x", null, true])).unwrap();
        assert_eq!(
            v,
            Value::List(vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::Text("x".into()),
                Value::Null,
                Value::Bool(true),
            ])
        );
        assert!(Value::from_json(&json!({"a": 1})).is_err());
    }

    #[test]
    fn serializes_as_plain_json() {
        let v = Value::from(vec![Value::Int(1), Value::from("a"), Value::Null]);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"[1,"a",null]"#);
    }

    #[test]
    fn scalar_readings() {
        assert_eq!(Value::from("42").as_i64(), Some(42));
        assert_eq!(Value::from("4.9").as_i64(), Some(4));
        assert_eq!(Value::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::Null.as_i64(), None);
        assert_eq!(Value::from("t").as_bool(), Some(true));
        assert_eq!(Value::Int(0).as_bool(), Some(false));
        assert_eq!(Value::from("maybe").as_bool(), None);
    }

    #[test]
    fn record_keeps_insertion_order() {
        let record = Record::new().set("b", 1).set("a", "x").set("b", 2);
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(record.get("b"), Some(&Value::Int(2)));

        let from_json = Record::from_json(&json!({"b": 2, "a": "x"})).unwrap();
        assert_eq!(from_json, record);
        assert!(Record::from_json(&json!([1])).is_err());
    }

    #[test]
    fn chrono_and_uuid_render_as_text() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(Value::from(date), Value::Text("2024-01-02".into()));

        let ts = date.and_hms_opt(3, 4, 5).unwrap();
        assert_eq!(Value::from(ts), Value::Text("2024-01-02 03:04:05".into()));

        let id = uuid::Uuid::nil();
        assert_eq!(
            Value::from(id),
            Value::Text("00000000-0000-0000-0000-000000000000".into())
        );
    }
}
