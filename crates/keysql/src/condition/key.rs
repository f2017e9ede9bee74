//! Condition key grammar.
//!
//! ```text
//! group-key := ("AND" | "OR") [ws+ "#" comment]        (case-insensitive)
//! leaf-key  := ["#"] column ["[" operator "]"]
//! column    := name ("." name)*
//! name      := [A-Za-z0-9_-]+
//! operator  := ">" | ">=" | "<" | "<=" | "!" | "<>" | "><" | "~" | "!~"
//! ```
//!
//! The comment on a group key only exists so that one map can hold several
//! groups of the same kind (`"AND #a"`, `"AND #b"`).

use crate::error::{SqlError, SqlResult};
use crate::ident::strip_raw_marker;
use std::fmt;

/// Logical joiner between sibling fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunctor {
    And,
    Or,
}

impl Conjunctor {
    /// SQL keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Conjunctor::And => "AND",
            Conjunctor::Or => "OR",
        }
    }

    /// Separator placed between fragments: `" AND "` / `" OR "`.
    pub fn separator(&self) -> &'static str {
        match self {
            Conjunctor::And => " AND ",
            Conjunctor::Or => " OR ",
        }
    }
}

/// Operator suffix of a condition key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `[>]`
    Gt,
    /// `[>=]`
    Gte,
    /// `[<]`
    Lt,
    /// `[<=]`
    Lte,
    /// `[!]`: negation of the inferred operator (`IS NOT NULL`, `NOT IN`, `!=`)
    Not,
    /// `[<>]`: `BETWEEN`
    Between,
    /// `[><]`: `NOT BETWEEN`
    NotBetween,
    /// `[~]`: `LIKE`
    Like,
    /// `[!~]`: `NOT LIKE`
    NotLike,
}

impl Operator {
    /// All operators, in suffix-table order.
    pub const ALL: [Operator; 9] = [
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Not,
        Operator::Between,
        Operator::NotBetween,
        Operator::Like,
        Operator::NotLike,
    ];

    /// The suffix text between the brackets.
    pub fn suffix(&self) -> &'static str {
        match self {
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Not => "!",
            Operator::Between => "<>",
            Operator::NotBetween => "><",
            Operator::Like => "~",
            Operator::NotLike => "!~",
        }
    }

    /// Parse the text between the brackets.
    pub fn from_suffix(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.suffix() == s)
    }

    /// The comparison keyword for `>`, `>=`, `<`, `<=`.
    pub(crate) fn comparison(&self) -> Option<&'static str> {
        match self {
            Operator::Gt => Some(">"),
            Operator::Gte => Some(">="),
            Operator::Lt => Some("<"),
            Operator::Lte => Some("<="),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.suffix())
    }
}

/// A nested-group key: `AND`, `OR`, `AND #comment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupKey {
    pub conjunctor: Conjunctor,
    pub comment: Option<String>,
}

impl GroupKey {
    /// Recognize a group key. Returns `None` for anything else.
    pub fn parse(key: &str) -> Option<Self> {
        let word_end = key
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(key.len());
        let (word, rest) = key.split_at(word_end);

        let conjunctor = if word.eq_ignore_ascii_case("and") {
            Conjunctor::And
        } else if word.eq_ignore_ascii_case("or") {
            Conjunctor::Or
        } else {
            return None;
        };

        if rest.is_empty() {
            return Some(Self {
                conjunctor,
                comment: None,
            });
        }

        let trimmed = rest.trim_start();
        if trimmed.len() == rest.len() {
            // no whitespace between the keyword and the comment
            return None;
        }
        let comment = trimmed.strip_prefix('#')?;
        Some(Self {
            conjunctor,
            comment: Some(comment.to_string()),
        })
    }
}

/// A tokenized leaf key: `#column[op]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionKey {
    /// Leading raw marker was present.
    pub raw: bool,
    /// Column reference, marker and suffix removed.
    pub column: String,
    /// Explicit operator, if any.
    pub operator: Option<Operator>,
}

impl ConditionKey {
    /// Tokenize a leaf key.
    pub fn parse(key: &str) -> SqlResult<Self> {
        let (raw, rest) = strip_raw_marker(key);
        let (column, operator) = split_suffix(rest, key, |s| Operator::from_suffix(s))?;
        Ok(Self {
            raw,
            column: column.to_string(),
            operator,
        })
    }
}

/// Split `column[suffix]` into the column and the parsed suffix.
///
/// `full_key` is only used in error messages.
pub(crate) fn split_suffix<'a, T>(
    rest: &'a str,
    full_key: &str,
    parse_op: impl Fn(&str) -> Option<T>,
) -> SqlResult<(&'a str, Option<T>)> {
    let (column, suffix) = match rest.find('[') {
        Some(open) => {
            let inner = rest[open + 1..].strip_suffix(']').ok_or_else(|| {
                SqlError::malformed(format!("unterminated operator in key '{full_key}'"))
            })?;
            let op = parse_op(inner).ok_or_else(|| {
                SqlError::malformed(format!("unknown operator '[{inner}]' in key '{full_key}'"))
            })?;
            (&rest[..open], Some(op))
        }
        None => (rest, None),
    };

    if column.is_empty() {
        return Err(SqlError::malformed(format!(
            "missing column name in key '{full_key}'"
        )));
    }
    if let Some(bad) = column.chars().find(|c| !is_column_char(*c)) {
        return Err(SqlError::malformed(format!(
            "invalid character '{bad}' in key '{full_key}'"
        )));
    }
    if column.split('.').any(str::is_empty) {
        return Err(SqlError::malformed(format!(
            "empty name segment in key '{full_key}'"
        )));
    }
    Ok((column, suffix))
}

fn is_column_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}
