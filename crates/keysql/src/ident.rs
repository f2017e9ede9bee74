//! Table and column identifier quoting.
//!
//! This module provides [`Ident`], a dotted SQL identifier split into parts, and the
//! quoting rules used by every statement builder:
//!
//! - `db.table` quotes each segment and prefixes the table segment
//! - `table.column` prefixes the table segment, `table.*` keeps the star bare
//! - a leading `#` (raw expression marker) is stripped from column names
//!
//! Names are not validated or escaped: a name containing the quote character passes
//! through as-is, so identifiers must never come from untrusted input.
//!
//! # Example
//! ```ignore
//! use keysql::{Config, Dialect, ident::Ident};
//!
//! let config = Config::new(Dialect::Mysql).with_prefix("wp_");
//! assert_eq!(Ident::table("users", &config.prefix).to_sql(config.quote_style), r#""wp_users""#);
//! ```

use crate::config::{Config, QuoteStyle};
use regex::Regex;
use std::sync::OnceLock;

/// Leading marker that flags a key as a raw SQL expression.
pub const RAW_MARKER: char = '#';

/// A part of a SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    /// A name that gets wrapped in quotes.
    Name(String),
    /// The bare `*` of `table.*`.
    Star,
}

/// A SQL identifier (column, table, or database-qualified table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
}

impl Ident {
    /// A single quoted name, no prefix.
    pub fn name(name: &str) -> Self {
        Self {
            parts: vec![IdentPart::Name(name.to_string())],
        }
    }

    /// A table name, optionally qualified by database (`db.table`).
    ///
    /// The prefix goes on every segment after the first dot, or on the only segment.
    pub fn table(name: &str, prefix: &str) -> Self {
        let mut segments = name.split('.');
        let first = segments.next().unwrap_or_default();
        let rest: Vec<&str> = segments.collect();

        if rest.is_empty() {
            return Self::name(&format!("{prefix}{first}"));
        }

        let mut parts = Vec::with_capacity(rest.len() + 1);
        parts.push(IdentPart::Name(first.to_string()));
        for seg in rest {
            parts.push(IdentPart::Name(format!("{prefix}{seg}")));
        }
        Self { parts }
    }

    /// A column reference: `*`, `table.*`, `table.column` or `column`.
    ///
    /// A leading [`RAW_MARKER`] is stripped. The table segment of a dotted
    /// reference receives the prefix.
    pub fn column(name: &str, prefix: &str) -> Self {
        let name = strip_raw_marker(name).1;

        if name == "*" {
            return Self {
                parts: vec![IdentPart::Star],
            };
        }

        if let Some(table) = name.strip_suffix(".*") {
            let mut ident = Self::table(table, prefix);
            ident.parts.push(IdentPart::Star);
            return ident;
        }

        match name.split_once('.') {
            Some((table, rest)) => {
                let mut parts = vec![IdentPart::Name(format!("{prefix}{table}"))];
                parts.extend(rest.split('.').map(|s| IdentPart::Name(s.to_string())));
                Self { parts }
            }
            None => Self::name(name),
        }
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self, style: QuoteStyle) -> String {
        let mut out = String::new();
        self.write_sql(style, &mut out);
        out
    }

    pub(crate) fn write_sql(&self, style: QuoteStyle, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match part {
                IdentPart::Name(s) => {
                    out.push(style.open());
                    out.push_str(s);
                    out.push(style.close());
                }
                IdentPart::Star => out.push('*'),
            }
        }
    }
}

/// Split a leading raw marker off `name`. Returns `(had_marker, rest)`.
pub fn strip_raw_marker(name: &str) -> (bool, &str) {
    match name.strip_prefix(RAW_MARKER) {
        Some(rest) => (true, rest),
        None => (false, name),
    }
}

/// Split `name(alias)` into `(name, alias)`.
///
/// Whitespace is allowed between the name and the parenthesis. Returns `None` when
/// the text is not in alias form.
pub fn split_alias(s: &str) -> Option<(&str, &str)> {
    static ALIAS_RE: OnceLock<Regex> = OnceLock::new();
    let re = ALIAS_RE.get_or_init(|| {
        Regex::new(r"^(#?[A-Za-z0-9_\-.]+)\s*\(([A-Za-z0-9_\-]+)\)$")
            .expect("invalid built-in alias regex")
    });
    let caps = re.captures(s.trim())?;
    let name = caps.get(1)?.as_str();
    let alias = caps.get(2)?.as_str();
    Some((name, alias))
}

/// Quote a table name with the configured prefix and quote style.
pub fn quote_table(config: &Config, name: &str) -> String {
    Ident::table(name, &config.prefix).to_sql(config.quote_style)
}

/// Quote a column reference with the configured prefix and quote style.
pub fn quote_column(config: &Config, name: &str) -> String {
    Ident::column(name, &config.prefix).to_sql(config.quote_style)
}

/// Quote a single name without applying the prefix.
pub fn quote_name(config: &Config, name: &str) -> String {
    Ident::name(name).to_sql(config.quote_style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dialect;

    fn cfg() -> Config {
        Config::new(Dialect::Mysql)
    }

    fn prefixed() -> Config {
        Config::new(Dialect::Mysql).with_prefix("wp_")
    }

    #[test]
    fn table_simple() {
        assert_eq!(quote_table(&cfg(), "users"), r#""users""#);
        assert_eq!(quote_table(&prefixed(), "users"), r#""wp_users""#);
    }

    #[test]
    fn table_with_database() {
        assert_eq!(quote_table(&prefixed(), "main.users"), r#""main"."wp_users""#);
    }

    #[test]
    fn column_forms() {
        let c = prefixed();
        assert_eq!(quote_column(&c, "*"), "*");
        assert_eq!(quote_column(&c, "name"), r#""name""#);
        assert_eq!(quote_column(&c, "users.name"), r#""wp_users"."name""#);
        assert_eq!(quote_column(&c, "users.*"), r#""wp_users".*"#);
        assert_eq!(quote_column(&c, "#created"), r#""created""#);
    }

    #[test]
    fn quote_styles() {
        let c = Config::new(Dialect::Mssql).with_quote_style(QuoteStyle::Bracket);
        assert_eq!(quote_column(&c, "users.id"), "[users].[id]");

        let c = Config::new(Dialect::Mysql).with_quote_style(QuoteStyle::Backtick);
        assert_eq!(quote_table(&c, "users"), "`users`");
    }

    #[test]
    fn malformed_names_pass_through() {
        assert_eq!(quote_column(&cfg(), r#"we"ird"#), r#""we"ird""#);
    }

    #[test]
    fn alias_split() {
        assert_eq!(split_alias("users(u)"), Some(("users", "u")));
        assert_eq!(split_alias("users (u)"), Some(("users", "u")));
        assert_eq!(split_alias("t.id(user_id)"), Some(("t.id", "user_id")));
        assert_eq!(split_alias("users"), None);
        assert_eq!(split_alias("NOW()"), None);
    }
}
