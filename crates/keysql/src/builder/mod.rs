//! Statement builders.
//!
//! A [`Builder`] captures one validated [`Config`] and turns query descriptions
//! into SQL text. Every method is a pure function of its arguments and the
//! configuration: no I/O, no shared mutable state, the same input always yields
//! the same string.
//!
//! # Example
//!
//! ```ignore
//! use keysql::prelude::*;
//!
//! let builder = Builder::new(Config::new(Dialect::Postgres))?;
//!
//! let sql = builder.select(
//!     &QuerySpec::new("users")
//!         .columns(["id", "name"])
//!         .conditions(ConditionMap::new().with("age[>]", 18))
//!         .limit(Limit::Range { offset: 10, count: 20 }),
//! )?;
//! assert_eq!(
//!     sql,
//!     r#"SELECT "id","name" FROM "users" WHERE "age" > 18 OFFSET 10 LIMIT 20"#
//! );
//!
//! let sql = builder.update(
//!     "users",
//!     &Record::new().set("name", "Bob").set("visits[+]", 1),
//!     &ConditionMap::new().with("id", 7).into(),
//! )?;
//! ```

mod delete;
mod insert;
mod select;
mod update;


pub use insert::{InsertModifier, InsertVerb};
pub use update::{ArithOp, Replacement};

use crate::config::Config;
use crate::error::{SqlError, SqlResult};
use crate::ident::quote_table;

/// Compiles query descriptions into SQL for one configuration.
#[derive(Debug, Clone)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Create a builder. Fails if the quote style is foreign to the dialect.
    pub fn new(config: Config) -> SqlResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this builder compiles for.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Quote a non-empty table name.
    pub(crate) fn table(&self, name: &str) -> SqlResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SqlError::malformed("missing table name"));
        }
        Ok(quote_table(&self.config, name))
    }
}
