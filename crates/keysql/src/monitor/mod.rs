//! Hooks and monitors around statement execution.
//!
//! [`QueryHook`]s run before every statement a [`crate::Database`] sends and
//! may rewrite or abort it. [`QueryMonitor`]s receive timing and outcome once
//! monitoring is enabled in [`MonitorConfig`].
//!
//! ```rust,ignore
//! use keysql::monitor::{MonitorConfig, StatsMonitor};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let stats = Arc::new(StatsMonitor::new());
//! let db = Database::new(config, executor)?
//!     .with_monitor_config(
//!         MonitorConfig::new()
//!             .with_slow_query_threshold(Duration::from_millis(50))
//!             .enable_monitoring(),
//!     )
//!     .with_monitor_arc(stats.clone());
//! ```

mod config;
mod monitors;
mod types;

#[cfg(feature = "tracing")]
mod tracing_hook;


pub use config::MonitorConfig;
pub use monitors::{CompositeHook, CompositeMonitor, NoopMonitor, QueryStats, StatsMonitor};
pub use types::{HookAction, QueryContext, QueryHook, QueryMonitor, QueryResult, QueryType};

#[cfg(feature = "tracing")]
pub use tracing_hook::TracingSqlHook;

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
