//! Configuration files and JSON query descriptions.

use keysql::prelude::*;
use keysql::{Aggregate, Fun};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct AppConfig {
    database: Config,
}

#[test]
fn config_from_toml() {
    let app: AppConfig = toml::from_str(
        r#"
        [database]
        dialect = "mariadb"
        quote_style = "backtick"
        prefix = "wp_"
        "#,
    )
    .unwrap();
    assert_eq!(
        app.database,
        Config::new(Dialect::Mysql)
            .with_quote_style(QuoteStyle::Backtick)
            .with_prefix("wp_")
    );

    let builder = Builder::new(app.database).unwrap();
    assert_eq!(
        builder.select(&QuerySpec::new("posts")).unwrap(),
        "SELECT * FROM `wp_posts`"
    );
}

#[test]
fn config_defaults_and_aliases() {
    let app: AppConfig = toml::from_str("[database]\ndialect = \"pgsql\"\n").unwrap();
    assert_eq!(app.database, Config::new(Dialect::Postgres));
}

#[test]
fn foreign_quote_style_is_caught_at_builder_construction() {
    let app: AppConfig = toml::from_str(
        "[database]\ndialect = \"postgres\"\nquote_style = \"bracket\"\n",
    )
    .unwrap();
    assert!(Builder::new(app.database).unwrap_err().is_dialect_mismatch());
}

#[test]
fn unknown_dialect_is_a_deserialize_error() {
    assert!(toml::from_str::<AppConfig>("[database]\ndialect = \"db2\"\n").is_err());
}

#[test]
fn full_json_query() {
    let spec = QuerySpec::from_json(&json!({
        "TABLE": "posts(p)",
        "COLUMNS": ["p.id", "p.title"],
        "JOIN": {
            "[>]users(u)": {"author_id": "id"},
            "[<]tags": "post_id"
        },
        "WHERE": {
            "p.published": true,
            "u.name[!]": null,
            "AND #dates": {"p.created[<>]": ["2024-01-01", "2024-12-31"]}
        },
        "GROUP": "p.id",
        "HAVING": {"p.id[>]": 0},
        "ORDER": {"p.id": "DESC"},
        "LIMIT": 10
    }))
    .unwrap();

    let builder = Builder::new(Config::new(Dialect::Postgres)).unwrap();
    assert_eq!(
        builder.select(&spec).unwrap(),
        concat!(
            r#"SELECT "p"."id","p"."title" FROM "posts" AS "p""#,
            r#" LEFT JOIN "users" AS "u" ON "p"."author_id" = "u"."id""#,
            r#" RIGHT JOIN "tags" USING ("post_id")"#,
            r#" WHERE "p"."published" = 1 AND "u"."name" IS NOT NULL"#,
            r#" AND (("p"."created" BETWEEN '2024-01-01' AND '2024-12-31'))"#,
            r#" GROUP BY "p"."id" HAVING "p"."id" > 0 ORDER BY "p"."id" DESC LIMIT 10"#,
        )
    );
}

#[test]
fn json_fun_and_aggregates() {
    let spec = QuerySpec::from_json(&json!({"TABLE": "users", "FUN": "count"})).unwrap();
    assert_eq!(spec.fun, Some(Fun::Aggregate(Aggregate::Count)));

    let builder = Builder::new(Config::new(Dialect::Mysql)).unwrap();
    assert_eq!(builder.select(&spec).unwrap(), r#"SELECT COUNT(*) FROM "users""#);
}

#[test]
fn json_shape_errors_are_malformed() {
    for bad in [
        json!(42),
        json!({"COLUMNS": ["id"]}),
        json!({"TABLE": "t", "JOIN": ["x"]}),
        json!({"TABLE": "t", "LIMIT": "ten"}),
        json!({"TABLE": "t", "WHERE": [1]}),
        json!({"TABLE": "t", "EXTRA": 1}),
    ] {
        let err = QuerySpec::from_json(&bad).unwrap_err();
        assert!(err.is_malformed(), "{bad}: {err}");
    }
}

#[test]
fn json_group_keys_must_hold_groups() {
    let builder = Builder::new(Config::new(Dialect::Postgres)).unwrap();
    for where_ in [json!({"OR": []}), json!({"OR": [1, 2]}), json!({"AND": "x"})] {
        let spec = QuerySpec::from_json(&json!({"TABLE": "t", "WHERE": where_})).unwrap();
        assert!(builder.select(&spec).unwrap_err().is_malformed(), "{where_}");
    }
}

#[test]
fn json_write_statements() {
    let builder = Builder::new(Config::new(Dialect::Postgres)).unwrap();

    let insert = InsertSpec::from_json(&json!({
        "TABLE": "users",
        "VALUES": [{"name": "ann", "age": 30}, {"name": "bob", "age": 41}]
    }))
    .unwrap();
    assert_eq!(
        builder.multi_insert_from(&insert).unwrap(),
        r#"INSERT INTO "users" ("name", "age") VALUES ('ann', 30), ('bob', 41)"#
    );
    assert_eq!(builder.insert_from(&insert).unwrap().len(), 2);

    let update = UpdateSpec::from_json(&json!({
        "UPDATE": "users",
        "SET": {"name": "carol", "visits[+]": 1},
        "WHERE": {"id": 7}
    }))
    .unwrap();
    assert_eq!(
        builder.update_from(&update).unwrap(),
        r#"UPDATE "users" SET "name" = 'carol', "visits" = "visits" + 1 WHERE "id" = 7"#
    );

    let delete = DeleteSpec::from_json(&json!({
        "FROM": "sessions",
        "WHERE": {"expires[<]": "2024-01-01"}
    }))
    .unwrap();
    assert_eq!(
        builder.delete_from(&delete).unwrap(),
        r#"DELETE FROM "sessions" WHERE "expires" < '2024-01-01'"#
    );
}
