//! Compiling and running statements with keysql
//!
//! Run with: cargo run --example basic -p keysql
//!
//! Set RUST_LOG=keysql=debug to see the SQL emitted by `TracingSqlHook`.
//!
//! This example demonstrates:
//! - Building SELECT / INSERT / UPDATE / DELETE from typed descriptions
//! - Per-dialect quoting and pagination
//! - Running statements through `Database` with a stand-in executor
//! - Collecting statistics with `StatsMonitor`

use keysql::prelude::*;
use keysql::{MonitorConfig, StatsMonitor};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Prints statements instead of sending them to a server.
#[derive(Default)]
struct EchoExecutor {
    next_id: Mutex<u64>,
}

impl Executor for EchoExecutor {
    fn query(&self, sql: &str) -> SqlResult<RowSet> {
        println!("  query> {sql}");
        Ok(RowSet::new(
            vec!["id".into(), "name".into()],
            vec![vec![Value::Int(1), Value::from("alice")]],
        ))
    }

    fn execute(&self, sql: &str) -> SqlResult<u64> {
        println!("  exec > {sql}");
        *self.next_id.lock().map_err(|e| SqlError::execution(e.to_string()))? += 1;
        Ok(1)
    }

    fn last_insert_id(&self) -> Option<String> {
        self.next_id.lock().ok().map(|id| id.to_string())
    }
}

fn main() -> SqlResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let spec = QuerySpec::new("users(u)")
        .columns(["u.id", "u.name"])
        .join(Join::left("roles(r)", JoinOn::on([("role_id", "id")])))
        .conditions(
            ConditionMap::new()
                .with("u.active", true)
                .with("u.email[!]", Value::Null)
                .group(
                    "OR",
                    ConditionMap::new()
                        .with("r.name", vec!["admin", "owner"])
                        .with("u.karma[>=]", 100),
                ),
        )
        .order_by(OrderItem::desc("u.id"))
        .limit(Limit::Range {
            offset: 20,
            count: 10,
        });

    println!("=== One spec, several dialects ===");
    for dialect in [Dialect::Mysql, Dialect::Postgres, Dialect::Oracle, Dialect::Mssql] {
        let builder = Builder::new(Config::new(dialect))?;
        println!("{dialect:>8}: {}", builder.select(&spec)?);
    }

    println!("\n=== Writes ===");
    let builder = Builder::new(Config::new(Dialect::Mysql).with_quote_style(QuoteStyle::Backtick))?;
    let rows = [
        Record::new().set("name", "bob").set("tags", vec!["a", "b"]),
        Record::new().set("name", "O'Reilly").set("tags", Vec::<String>::new()),
    ];
    println!("{}", builder.multi_insert("users", &rows, InsertVerb::parse("INSERT IGNORE"))?);
    println!(
        "{}",
        builder.update(
            "users",
            &Record::new().set("name", "carol").set("visits[+]", 1),
            &ConditionMap::new().with("id", 7).into(),
        )?
    );
    println!(
        "{}",
        builder.delete("sessions", &ConditionMap::new().with("expires[<]", "2024-01-01").into())?
    );

    println!("\n=== Executing through Database ===");
    let stats = Arc::new(StatsMonitor::new());
    let db = Database::new(Config::new(Dialect::Postgres), EchoExecutor::default())?
        .with_hook(TracingSqlHook::new())
        .with_monitor_arc(stats.clone())
        .with_monitor_config(
            MonitorConfig::new()
                .with_slow_query_threshold(Duration::from_millis(100))
                .enable_monitoring(),
        );

    let users = db.select(&spec)?;
    println!("  rows : {users:?}");
    let ids = db.insert("users", &rows, InsertVerb::insert())?;
    println!("  ids  : {ids:?}");
    println!("  quote: {}", db.quote("it's"));

    let snapshot = stats.stats();
    println!(
        "\n{} statements ({} selects, {} inserts), {} failed",
        snapshot.total_queries, snapshot.select_count, snapshot.insert_count, snapshot.failed_queries
    );

    Ok(())
}
