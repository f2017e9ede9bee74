//! Compilation configuration: target dialect, identifier quote style and table prefix.
//!
//! A [`Config`] is captured once by [`crate::Builder`] and only read afterwards,
//! so every statement compiled by one builder sees the same settings.
//!
//! # Example
//! ```ignore
//! use keysql::{Config, Dialect};
//!
//! let config = Config::new(Dialect::Postgres).with_prefix("app_");
//! ```

use crate::error::{SqlError, SqlResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[serde(alias = "mariadb")]
    Mysql,
    #[serde(alias = "pgsql", alias = "postgresql")]
    Postgres,
    #[serde(alias = "sqlserver")]
    Mssql,
    Sqlite,
    Oracle,
    Sybase,
}

impl Dialect {
    /// Lowercase dialect name, as used in error messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Mysql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Mssql => "mssql",
            Dialect::Sqlite => "sqlite",
            Dialect::Oracle => "oracle",
            Dialect::Sybase => "sybase",
        }
    }

    /// Whether backslash is an escape character inside string literals.
    pub fn escapes_backslash(&self) -> bool {
        matches!(self, Dialect::Mysql)
    }

    /// Whether this dialect understands MySQL-only syntax (`FIELD()`, `MATCH ... AGAINST`,
    /// `REPLACE INTO`, insert modifiers).
    pub fn is_mysql(&self) -> bool {
        matches!(self, Dialect::Mysql)
    }

    /// Build a [`SqlError::DialectMismatch`] for this dialect.
    pub(crate) fn mismatch(&self, feature: impl Into<String>) -> SqlError {
        SqlError::dialect_mismatch(self.name(), feature)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Dialect::Mysql),
            "postgres" | "postgresql" | "pgsql" => Ok(Dialect::Postgres),
            "mssql" | "sqlserver" => Ok(Dialect::Mssql),
            "sqlite" => Ok(Dialect::Sqlite),
            "oracle" => Ok(Dialect::Oracle),
            "sybase" => Ok(Dialect::Sybase),
            other => Err(SqlError::malformed(format!("unknown dialect '{other}'"))),
        }
    }
}

/// How identifiers are wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// `"name"` (standard SQL; MySQL needs `ANSI_QUOTES`, MSSQL `QUOTED_IDENTIFIER ON`)
    #[default]
    Ansi,
    /// `` `name` `` (MySQL, SQLite)
    Backtick,
    /// `[name]` (MSSQL, Sybase, SQLite)
    Bracket,
}

impl QuoteStyle {
    /// Opening quote character.
    pub fn open(&self) -> char {
        match self {
            QuoteStyle::Ansi => '"',
            QuoteStyle::Backtick => '`',
            QuoteStyle::Bracket => '[',
        }
    }

    /// Closing quote character.
    pub fn close(&self) -> char {
        match self {
            QuoteStyle::Ansi => '"',
            QuoteStyle::Backtick => '`',
            QuoteStyle::Bracket => ']',
        }
    }

    fn supported_by(&self, dialect: Dialect) -> bool {
        match self {
            QuoteStyle::Ansi => true,
            QuoteStyle::Backtick => matches!(dialect, Dialect::Mysql | Dialect::Sqlite),
            QuoteStyle::Bracket => {
                matches!(dialect, Dialect::Mssql | Dialect::Sybase | Dialect::Sqlite)
            }
        }
    }
}

impl FromStr for QuoteStyle {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ansi" | "double" => Ok(QuoteStyle::Ansi),
            "backtick" => Ok(QuoteStyle::Backtick),
            "bracket" => Ok(QuoteStyle::Bracket),
            other => Err(SqlError::malformed(format!("unknown quote style '{other}'"))),
        }
    }
}

/// Immutable compilation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Target dialect.
    pub dialect: Dialect,
    /// Identifier quote style.
    #[serde(default)]
    pub quote_style: QuoteStyle,
    /// Prefix prepended to every table name.
    #[serde(default)]
    pub prefix: String,
}

impl Config {
    /// Create a configuration for `dialect` with ANSI quoting and no prefix.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            quote_style: QuoteStyle::Ansi,
            prefix: String::new(),
        }
    }

    /// Set the table prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the identifier quote style.
    pub fn with_quote_style(mut self, style: QuoteStyle) -> Self {
        self.quote_style = style;
        self
    }

    /// Check that the quote style is understood by the dialect.
    pub fn validate(&self) -> SqlResult<()> {
        if !self.quote_style.supported_by(self.dialect) {
            return Err(self
                .dialect
                .mismatch(format!("{:?} identifier quoting", self.quote_style)));
        }
        Ok(())
    }
}
