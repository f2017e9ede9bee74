//! Compile-and-run façade over an [`Executor`].
//!
//! [`Database`] pairs a [`Builder`] with a caller-supplied executor. Each
//! operation compiles its statement, passes it through the configured
//! [`QueryHook`], runs it, reports the outcome to the [`QueryMonitor`] and
//! decodes the result.
//!
//! ```rust,ignore
//! let db = Database::new(Config::new(Dialect::Mysql), my_driver)?
//!     .with_hook(TracingSqlHook::new());
//!
//! let adults = db.count(
//!     &QuerySpec::new("users").conditions(ConditionMap::new().with("age[>=]", 18)),
//! )?;
//! ```

use crate::builder::{Builder, InsertVerb, Replacement};
use crate::clause::Clauses;
use crate::client::{Executor, RowSet};
use crate::config::Config;
use crate::error::{SqlError, SqlResult};
use crate::monitor::{
    CompositeHook, HookAction, MonitorConfig, NoopMonitor, QueryContext, QueryHook, QueryMonitor,
    QueryResult, QueryType,
};
use crate::query::{Aggregate, QuerySpec};
use crate::quote::quote_literal;
use crate::value::{Record, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A [`Builder`] bound to an executor, with hooks and monitoring.
pub struct Database<E> {
    builder: Builder,
    executor: E,
    monitor: Arc<dyn QueryMonitor>,
    hook: Option<Arc<dyn QueryHook>>,
    monitor_config: MonitorConfig,
}

impl<E: Executor> Database<E> {
    /// Validate `config` and wrap `executor`.
    pub fn new(config: Config, executor: E) -> SqlResult<Self> {
        Ok(Self::from_builder(Builder::new(config)?, executor))
    }

    pub fn from_builder(builder: Builder, executor: E) -> Self {
        Self {
            builder,
            executor,
            monitor: Arc::new(NoopMonitor),
            hook: None,
            monitor_config: MonitorConfig::default(),
        }
    }

    pub fn with_monitor_config(mut self, config: MonitorConfig) -> Self {
        self.monitor_config = config;
        self
    }

    pub fn with_monitor<M: QueryMonitor + 'static>(self, monitor: M) -> Self {
        self.with_monitor_arc(Arc::new(monitor))
    }

    pub fn with_monitor_arc(mut self, monitor: Arc<dyn QueryMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Replace the hook.
    pub fn with_hook<H: QueryHook + 'static>(self, hook: H) -> Self {
        self.with_hook_arc(Arc::new(hook))
    }

    pub fn with_hook_arc(mut self, hook: Arc<dyn QueryHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Chain a hook after the existing one.
    pub fn add_hook<H: QueryHook + 'static>(self, hook: H) -> Self {
        self.add_hook_arc(Arc::new(hook))
    }

    pub fn add_hook_arc(mut self, hook: Arc<dyn QueryHook>) -> Self {
        let combined: Arc<dyn QueryHook> = match self.hook.take() {
            None => hook,
            Some(existing) => Arc::new(CompositeHook::new().add_arc(existing).add_arc(hook)),
        };
        self.hook = Some(combined);
        self
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    pub fn config(&self) -> &Config {
        self.builder.config()
    }

    pub fn monitor_config(&self) -> &MonitorConfig {
        &self.monitor_config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Quote text as a literal, preferring the executor's own quoting.
    pub fn quote(&self, text: &str) -> String {
        self.executor
            .quote_literal(text)
            .unwrap_or_else(|| quote_literal(self.config().dialect, text))
    }

    // ── raw statements ──

    /// Run arbitrary row-returning SQL through hooks and monitors.
    pub fn query(&self, sql: &str) -> SqlResult<RowSet> {
        self.query_inner(self.context(sql, None))
    }

    pub fn query_tagged(&self, tag: &str, sql: &str) -> SqlResult<RowSet> {
        self.query_inner(self.context(sql, None).with_tag(tag))
    }

    /// Run arbitrary SQL for its affected-row count.
    pub fn exec(&self, sql: &str) -> SqlResult<u64> {
        self.exec_inner(self.context(sql, None))
    }

    pub fn exec_tagged(&self, tag: &str, sql: &str) -> SqlResult<u64> {
        self.exec_inner(self.context(sql, None).with_tag(tag))
    }

    // ── reads ──

    pub fn select(&self, spec: &QuerySpec) -> SqlResult<Vec<Record>> {
        let sql = self.builder.select(spec)?;
        let rows = self.query_inner(self.context(&sql, Some(&spec.table)))?;
        Ok(rows.records())
    }

    /// First matching row.
    pub fn get(&self, spec: &QuerySpec) -> SqlResult<Option<Record>> {
        let sql = self.builder.get(spec)?;
        let rows = self.query_inner(self.context(&sql, Some(&spec.table)))?;
        Ok(rows.record(0))
    }

    pub fn has(&self, spec: &QuerySpec) -> SqlResult<bool> {
        let sql = self.builder.has(spec)?;
        let rows = self.query_inner(self.context(&sql, Some(&spec.table)))?;
        Ok(rows.scalar().and_then(Value::as_bool).unwrap_or(false))
    }

    /// `COUNT(...)`; a NULL or missing result counts as zero.
    pub fn count(&self, spec: &QuerySpec) -> SqlResult<i64> {
        let value = self.aggregate(Aggregate::Count, spec)?;
        decode(&value, "COUNT", Value::as_i64).map(|n| n.unwrap_or(0))
    }

    pub fn max(&self, spec: &QuerySpec) -> SqlResult<Value> {
        self.aggregate(Aggregate::Max, spec)
    }

    pub fn min(&self, spec: &QuerySpec) -> SqlResult<Value> {
        self.aggregate(Aggregate::Min, spec)
    }

    /// `AVG(...)`; `None` when there were no rows to average.
    pub fn avg(&self, spec: &QuerySpec) -> SqlResult<Option<f64>> {
        let value = self.aggregate(Aggregate::Avg, spec)?;
        decode(&value, "AVG", Value::as_f64)
    }

    pub fn sum(&self, spec: &QuerySpec) -> SqlResult<Option<f64>> {
        let value = self.aggregate(Aggregate::Sum, spec)?;
        decode(&value, "SUM", Value::as_f64)
    }

    /// Run an aggregate and return its scalar (`Value::Null` for no rows).
    pub fn aggregate(&self, aggregate: Aggregate, spec: &QuerySpec) -> SqlResult<Value> {
        let sql = self.builder.aggregate(aggregate, spec)?;
        let rows = self.query_inner(self.context(&sql, Some(&spec.table)))?;
        Ok(rows.scalar().cloned().unwrap_or(Value::Null))
    }

    /// Column names of `table`.
    pub fn headers(&self, table: &str) -> SqlResult<Vec<String>> {
        let sql = self.builder.headers(table)?;
        Ok(self.query_inner(self.context(&sql, Some(table)))?.columns)
    }

    // ── writes ──

    /// Insert each row with its own statement; returns the generated id per row.
    pub fn insert(
        &self,
        table: &str,
        rows: &[Record],
        verb: InsertVerb,
    ) -> SqlResult<Vec<Option<String>>> {
        let statements = self.builder.insert(table, rows, verb)?;
        let mut ids = Vec::with_capacity(statements.len());
        for sql in &statements {
            self.exec_inner(self.context(sql, Some(table)))?;
            ids.push(self.executor.last_insert_id());
        }
        Ok(ids)
    }

    pub fn multi_insert(&self, table: &str, rows: &[Record], verb: InsertVerb) -> SqlResult<u64> {
        let sql = self.builder.multi_insert(table, rows, verb)?;
        self.exec_inner(self.context(&sql, Some(table)))
    }

    pub fn update(&self, table: &str, set: &Record, clauses: &Clauses) -> SqlResult<u64> {
        let sql = self.builder.update(table, set, clauses)?;
        self.exec_inner(self.context(&sql, Some(table)))
    }

    pub fn replace(
        &self,
        table: &str,
        replacements: &[Replacement],
        clauses: &Clauses,
    ) -> SqlResult<u64> {
        let sql = self.builder.replace(table, replacements, clauses)?;
        self.exec_inner(self.context(&sql, Some(table)))
    }

    pub fn delete(&self, table: &str, clauses: &Clauses) -> SqlResult<u64> {
        let sql = self.builder.delete(table, clauses)?;
        self.exec_inner(self.context(&sql, Some(table)))
    }

    pub fn truncate(&self, table: &str) -> SqlResult<u64> {
        let sql = self.builder.truncate(table)?;
        self.exec_inner(self.context(&sql, Some(table)))
    }

    // ── plumbing ──

    fn context(&self, sql: &str, table: Option<&str>) -> QueryContext {
        let ctx = QueryContext::new(sql).with_dialect(self.config().dialect);
        match table {
            Some(table) => ctx.with_field("table", table),
            None => ctx,
        }
    }

    fn apply_hook(&self, ctx: &mut QueryContext) -> SqlResult<()> {
        let Some(hook) = &self.hook else {
            return Ok(());
        };

        match hook.before_query(ctx) {
            HookAction::Continue => Ok(()),
            HookAction::ModifySql {
                exec_sql,
                canonical_sql,
            } => {
                ctx.exec_sql = exec_sql;
                if let Some(canonical_sql) = canonical_sql {
                    ctx.canonical_sql = canonical_sql;
                }
                ctx.query_type = QueryType::from_sql(&ctx.canonical_sql);
                Ok(())
            }
            HookAction::Abort(reason) => Err(SqlError::Aborted(reason)),
        }
    }

    fn report_result(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        if let Some(hook) = &self.hook {
            hook.after_query(ctx, duration, result);
        }

        if !self.monitor_config.monitoring_enabled {
            return;
        }
        self.monitor.on_query_complete(ctx, duration, result);
        if let Some(threshold) = self.monitor_config.slow_query_threshold
            && duration > threshold
        {
            self.monitor.on_slow_query(ctx, duration);
        }
    }

    fn query_inner(&self, mut ctx: QueryContext) -> SqlResult<RowSet> {
        self.run(&mut ctx, |exec, ctx| {
            let rows = match &ctx.tag {
                Some(tag) => exec.query_tagged(tag, &ctx.exec_sql),
                None => exec.query(&ctx.exec_sql),
            }?;
            let reported = QueryResult::Rows(rows.len());
            Ok((rows, reported))
        })
    }

    fn exec_inner(&self, mut ctx: QueryContext) -> SqlResult<u64> {
        self.run(&mut ctx, |exec, ctx| {
            let affected = match &ctx.tag {
                Some(tag) => exec.execute_tagged(tag, &ctx.exec_sql),
                None => exec.execute(&ctx.exec_sql),
            }?;
            Ok((affected, QueryResult::Affected(affected)))
        })
    }

    fn run<T>(
        &self,
        ctx: &mut QueryContext,
        f: impl FnOnce(&E, &QueryContext) -> SqlResult<(T, QueryResult)>,
    ) -> SqlResult<T> {
        self.apply_hook(ctx)?;
        if self.monitor_config.monitoring_enabled {
            self.monitor.on_query_start(ctx);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "keysql.sql",
            query_type = ?ctx.query_type,
            tag = ctx.tag.as_deref().unwrap_or("-"),
            "executing statement"
        );

        let start = Instant::now();
        let outcome = f(&self.executor, ctx);
        let duration = start.elapsed();

        match outcome {
            Ok((value, reported)) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(target: "keysql.sql", ?duration, result = %reported, "statement finished");
                self.report_result(ctx, duration, &reported);
                Ok(value)
            }
            Err(err) => {
                self.report_result(ctx, duration, &QueryResult::error(err.to_string()));
                Err(err)
            }
        }
    }
}

fn decode<T>(
    value: &Value,
    what: &str,
    read: impl Fn(&Value) -> Option<T>,
) -> SqlResult<Option<T>> {
    if matches!(value, Value::Null) {
        return Ok(None);
    }
    read(value).map(Some).ok_or_else(|| {
        SqlError::execution(format!("{what} returned a non-numeric {} value", value.tag().as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::ConditionMap;
    use crate::config::Dialect;
    use crate::monitor::StatsMonitor;
    use std::sync::Mutex;

    /// Records every statement and replays canned results.
    #[derive(Default)]
    struct MockExecutor {
        log: Mutex<Vec<String>>,
        rows: RowSet,
        affected: u64,
        fail: bool,
    }

    impl MockExecutor {
        fn with_rows(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
            Self {
                rows: RowSet::new(columns.iter().map(|c| c.to_string()).collect(), rows),
                ..Self::default()
            }
        }

        fn statements(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    impl Executor for MockExecutor {
        fn query(&self, sql: &str) -> SqlResult<RowSet> {
            self.log.lock().unwrap().push(sql.to_string());
            if self.fail {
                return Err(SqlError::execution("connection lost"));
            }
            Ok(self.rows.clone())
        }

        fn execute(&self, sql: &str) -> SqlResult<u64> {
            self.log.lock().unwrap().push(sql.to_string());
            if self.fail {
                return Err(SqlError::execution("connection lost"));
            }
            Ok(self.affected)
        }

        fn last_insert_id(&self) -> Option<String> {
            Some(self.log.lock().unwrap().len().to_string())
        }
    }

    fn db(exec: MockExecutor) -> Database<MockExecutor> {
        Database::new(Config::new(Dialect::Postgres), exec).unwrap()
    }

    #[test]
    fn select_decodes_records() {
        let db = db(MockExecutor::with_rows(
            &["id", "name"],
            vec![vec![Value::Int(1), Value::from("ann")]],
        ));
        let rows = db.select(&QuerySpec::new("users")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some(&Value::from("ann")));
        assert_eq!(db.executor().statements(), vec![r#"SELECT * FROM "users""#]);
    }

    #[test]
    fn get_returns_first_row_or_none() {
        let db1 = db(MockExecutor::with_rows(&["id"], vec![vec![Value::Int(4)]]));
        let row = db1.get(&QuerySpec::new("users")).unwrap().unwrap();
        assert_eq!(row.get("id"), Some(&Value::Int(4)));
        assert!(db1.executor().statements()[0].ends_with("LIMIT 1"));

        let db2 = db(MockExecutor::default());
        assert_eq!(db2.get(&QuerySpec::new("users")).unwrap(), None);
    }

    #[test]
    fn has_reads_truthy_scalar() {
        let yes = db(MockExecutor::with_rows(&["e"], vec![vec![Value::from("1")]]));
        assert!(yes.has(&QuerySpec::new("users")).unwrap());
        assert!(yes.executor().statements()[0].starts_with("SELECT EXISTS("));

        let no = db(MockExecutor::with_rows(&["e"], vec![vec![Value::Bool(false)]]));
        assert!(!no.has(&QuerySpec::new("users")).unwrap());
    }

    #[test]
    fn aggregates_decode_scalars() {
        let db1 = db(MockExecutor::with_rows(&["c"], vec![vec![Value::from("42")]]));
        assert_eq!(db1.count(&QuerySpec::new("users")).unwrap(), 42);
        assert_eq!(
            db1.executor().statements()[0],
            r#"SELECT COUNT(*) FROM "users""#
        );

        let db2 = db(MockExecutor::with_rows(&["a"], vec![vec![Value::Float(2.5)]]));
        assert_eq!(db2.avg(&QuerySpec::new("t").column("x")).unwrap(), Some(2.5));

        let db3 = db(MockExecutor::with_rows(&["s"], vec![vec![Value::Null]]));
        assert_eq!(db3.sum(&QuerySpec::new("t").column("x")).unwrap(), None);
        assert_eq!(db3.count(&QuerySpec::new("t")).unwrap(), 0);
        assert_eq!(db3.max(&QuerySpec::new("t").column("x")).unwrap(), Value::Null);

        let db4 = db(MockExecutor::with_rows(&["s"], vec![vec![Value::from("abc")]]));
        assert!(db4.count(&QuerySpec::new("t")).is_err());
    }

    #[test]
    fn insert_collects_ids_per_row() {
        let db = db(MockExecutor::default());
        let rows = [Record::new().set("a", 1), Record::new().set("a", 2)];
        let ids = db.insert("t", &rows, InsertVerb::insert()).unwrap();
        assert_eq!(ids, vec![Some("1".to_string()), Some("2".to_string())]);
    }

    #[test]
    fn writes_return_affected_counts() {
        let db = db(MockExecutor {
            affected: 3,
            ..MockExecutor::default()
        });
        let clauses: Clauses = ConditionMap::new().with("id", 1).into();
        assert_eq!(db.update("t", &Record::new().set("a", 1), &clauses).unwrap(), 3);
        assert_eq!(db.delete("t", &clauses).unwrap(), 3);
        assert_eq!(db.truncate("t").unwrap(), 3);
        assert_eq!(
            db.executor().statements(),
            vec![
                r#"UPDATE "t" SET "a" = 1 WHERE "id" = 1"#,
                r#"DELETE FROM "t" WHERE "id" = 1"#,
                r#"TRUNCATE TABLE "t""#,
            ]
        );
    }

    #[test]
    fn compile_errors_never_reach_the_executor() {
        let db = db(MockExecutor::default());
        assert!(db.select(&QuerySpec::new("")).unwrap_err().is_malformed());
        assert!(db.executor().statements().is_empty());
    }

    #[test]
    fn hook_can_rewrite_and_abort() {
        struct Comment;
        impl QueryHook for Comment {
            fn before_query(&self, ctx: &QueryContext) -> HookAction {
                HookAction::ModifySql {
                    exec_sql: format!("/* app */ {}", ctx.exec_sql),
                    canonical_sql: None,
                }
            }
        }
        struct NoDelete;
        impl QueryHook for NoDelete {
            fn before_query(&self, ctx: &QueryContext) -> HookAction {
                if ctx.query_type == QueryType::Delete {
                    HookAction::Abort("deletes disabled".into())
                } else {
                    HookAction::Continue
                }
            }
        }

        let db = db(MockExecutor::default()).add_hook(Comment).add_hook(NoDelete);
        db.exec("UPDATE \"t\" SET \"a\" = 1").unwrap();
        assert_eq!(
            db.executor().statements(),
            vec![r#"/* app */ UPDATE "t" SET "a" = 1"#]
        );

        let err = db.delete("t", &Clauses::new()).unwrap_err();
        assert!(matches!(err, SqlError::Aborted(ref r) if r == "deletes disabled"));
        assert_eq!(db.executor().statements().len(), 1);
    }

    #[test]
    fn monitor_sees_results_only_when_enabled() {
        let stats = Arc::new(StatsMonitor::new());
        let quiet = db(MockExecutor::default()).with_monitor_arc(stats.clone());
        quiet.query("SELECT 1").unwrap();
        assert_eq!(stats.stats().total_queries, 0);

        let loud = db(MockExecutor {
            fail: true,
            ..MockExecutor::default()
        })
        .with_monitor_arc(stats.clone())
        .with_monitor_config(
            MonitorConfig::new()
                .with_slow_query_threshold(Duration::ZERO)
                .enable_monitoring(),
        );
        assert!(loud.query_tagged("probe", "SELECT 1").is_err());
        let snapshot = stats.stats();
        assert_eq!(snapshot.total_queries, 1);
        assert_eq!(snapshot.failed_queries, 1);
    }

    #[test]
    fn quote_falls_back_to_dialect_escaping() {
        struct DriverQuote;
        impl Executor for DriverQuote {
            fn query(&self, _: &str) -> SqlResult<RowSet> {
                Ok(RowSet::default())
            }
            fn execute(&self, _: &str) -> SqlResult<u64> {
                Ok(0)
            }
            fn quote_literal(&self, text: &str) -> Option<String> {
                Some(format!("E'{text}'"))
            }
        }

        let builtin = db(MockExecutor::default());
        assert_eq!(builtin.quote("it's"), "'it''s'");
        let driver = Database::new(Config::new(Dialect::Postgres), DriverQuote).unwrap();
        assert_eq!(driver.quote("x"), "E'x'");
    }

    #[test]
    fn headers_return_column_names() {
        let db = db(MockExecutor::with_rows(&["id", "email"], vec![]));
        assert_eq!(db.headers("users").unwrap(), vec!["id", "email"]);
    }
}
