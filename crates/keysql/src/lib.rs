//! # keysql
//!
//! Compile key/value query descriptions into SQL text.
//!
//! ## Features
//!
//! - **Keys carry the query**: `"age[>=]": 18`, `"name[~]": "ann"`, `"AND #vip": {...}`
//! - **Dialect aware**: MySQL, PostgreSQL, SQL Server, SQLite, Oracle and Sybase quoting and pagination
//! - **Typed or JSON**: build a [`QuerySpec`] fluently or ingest one with [`QuerySpec::from_json`]
//! - **Loud failures**: unsupported operator/value pairs and malformed keys are errors, never silent SQL
//! - **Bring your own driver**: [`Database`] runs compiled SQL through any [`Executor`], with hooks and monitors
//!
//! ## Compiling
//!
//! ```ignore
//! use keysql::prelude::*;
//!
//! let builder = Builder::new(Config::new(Dialect::Postgres))?;
//!
//! let sql = builder.select(
//!     &QuerySpec::new("users")
//!         .join(Join::left("roles", JoinOn::on([("user_id", "id")])))
//!         .conditions(
//!             ConditionMap::new()
//!                 .with("status", "active")
//!                 .group("OR", ConditionMap::new().with("age[<]", 18).with("age[>]", 65)),
//!         )
//!         .order_by(OrderItem::desc("created"))
//!         .limit(Limit::Count(10)),
//! )?;
//! ```
//!
//! ## From JSON
//!
//! ```ignore
//! let spec = QuerySpec::from_json(&serde_json::json!({
//!     "TABLE": "users",
//!     "COLUMNS": ["id", "name"],
//!     "WHERE": { "id[!]": [1, 2, 3] },
//!     "LIMIT": [20, 10]
//! }))?;
//! let sql = builder.select(&spec)?;
//! ```

pub mod builder;
pub mod clause;
pub mod client;
pub mod condition;
pub mod config;
pub mod database;
pub mod error;
pub mod ident;
pub mod monitor;
pub mod prelude;
pub mod query;
pub mod quote;
pub mod value;
pub mod write;

pub use builder::{ArithOp, Builder, InsertModifier, InsertVerb, Replacement};
pub use clause::{Clauses, Direction, FullText, Limit, Order, OrderItem, predicate};
pub use client::{Executor, RowSet};
pub use condition::{
    ConditionKey, ConditionMap, Conjunctor, GroupKey, Node, Operator, compile_conditions,
};
pub use config::{Config, Dialect, QuoteStyle};
pub use database::Database;
pub use error::{SqlError, SqlResult};
pub use monitor::{
    CompositeHook, CompositeMonitor, HookAction, MonitorConfig, NoopMonitor, QueryContext,
    QueryHook, QueryMonitor, QueryResult, QueryStats, QueryType, StatsMonitor,
};
pub use query::{Aggregate, Column, Columns, Fun, Join, JoinKind, JoinOn, QuerySpec};
pub use value::{Record, Value, ValueTag};
pub use write::{DeleteSpec, InsertSpec, UpdateSpec};

#[cfg(feature = "tracing")]
pub use monitor::TracingSqlHook;
