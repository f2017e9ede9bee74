//! Compiling JSON query descriptions
//!
//! Run with: cargo run --example json_spec -p keysql -- [dialect]
//!
//! Reads one JSON query description per line from stdin and prints the SQL,
//! or the error, for each. The dialect defaults to `mysql`.
//!
//! ```text
//! echo '{"TABLE":"users","WHERE":{"age[>]":18},"LIMIT":[0,10]}' | cargo run --example json_spec -- pgsql
//! ```

use keysql::prelude::*;
use std::io::BufRead;

fn main() -> SqlResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let dialect: Dialect = std::env::args()
        .nth(1)
        .as_deref()
        .unwrap_or("mysql")
        .parse()?;
    let builder = Builder::new(Config::new(dialect))?;

    for line in std::io::stdin().lock().lines() {
        let line = line.map_err(|e| SqlError::malformed(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }

        let compiled = serde_json::from_str::<serde_json::Value>(&line)
            .map_err(SqlError::from)
            .and_then(|json| QuerySpec::from_json(&json))
            .and_then(|spec| builder.select(&spec));

        match compiled {
            Ok(sql) => println!("{sql}"),
            Err(err) => {
                tracing::warn!(error = %err, "skipping query");
                println!("-- error: {err}");
            }
        }
    }

    Ok(())
}
