//! Common imports.
//!
//! ```ignore
//! use keysql::prelude::*;
//! ```

pub use crate::{
    Builder, Clauses, ConditionMap, Config, Database, DeleteSpec, Dialect, Executor, InsertSpec,
    InsertVerb, Join, JoinOn, Limit, OrderItem, QuerySpec, QuoteStyle, Record, RowSet, SqlError,
    SqlResult, UpdateSpec, Value,
};

#[cfg(feature = "tracing")]
pub use crate::TracingSqlHook;
