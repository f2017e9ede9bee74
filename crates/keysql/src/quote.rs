//! Value quoting: turning a [`Value`] into a safe SQL literal.

use crate::config::{Config, Dialect};
use crate::error::SqlResult;
use crate::ident::strip_raw_marker;
use crate::value::{Value, float_sql};
use regex::Regex;
use std::sync::OnceLock;

/// Escape `text` and wrap it in single quotes for `dialect`.
///
/// MySQL treats backslash as an escape character, so it is doubled there along with
/// NUL; every dialect doubles embedded single quotes.
pub fn quote_literal(dialect: Dialect, text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\'' => out.push_str("''"),
            '\\' if dialect.escapes_backslash() => out.push_str("\\\\"),
            '\0' if dialect.escapes_backslash() => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// `true` if `text` has the shape of a bare function call such as `NOW()` or
/// `DATE_ADD(x)`: upper-case name, one pair of parentheses, nothing after.
pub fn is_function_call(text: &str) -> bool {
    static FN_RE: OnceLock<Regex> = OnceLock::new();
    FN_RE
        .get_or_init(|| Regex::new(r"^[A-Z0-9_]*\([^)]*\)$").expect("invalid built-in function regex"))
        .is_match(text)
}

/// Quote text for the column named by `key`.
///
/// Raw-marked keys (`#col`) whose text is a function call keep the text verbatim.
pub fn quote_fn(config: &Config, key: &str, text: &str) -> String {
    let (raw, _) = strip_raw_marker(key);
    if raw && is_function_call(text) {
        text.to_string()
    } else {
        quote_literal(config.dialect, text)
    }
}

/// Render `value` as a SQL literal for the column named by `key`.
///
/// - `Null` → `NULL`
/// - `List` → JSON text, quoted (an empty list gives `'[]'`)
/// - `Bool` → `1` / `0`
/// - `Int` / `Float` → unquoted number
/// - `Text` → see [`quote_fn`]
pub fn quote_value(config: &Config, key: &str, value: &Value) -> SqlResult<String> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::List(_) => {
            let json = serde_json::to_string(value)?;
            Ok(quote_literal(config.dialect, &json))
        }
        Value::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => float_sql(*f),
        Value::Text(s) => Ok(quote_fn(config, key, s)),
    }
}

/// Render a value that is not tied to a raw-capable key (list items, BETWEEN bounds).
pub fn quote_scalar(config: &Config, value: &Value) -> SqlResult<String> {
    quote_value(config, "", value)
}
