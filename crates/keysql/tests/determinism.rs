//! Compilation is a pure function of its input and configuration.

use keysql::prelude::*;
use proptest::prelude::*;

fn sample_spec(min_age: i64, names: Vec<String>, page: (u64, u64)) -> QuerySpec {
    QuerySpec::new("users(u)")
        .columns(["u.id", "u.name(label)"])
        .join(Join::left("roles(r)", JoinOn::on([("role_id", "id")])))
        .conditions(
            ConditionMap::new()
                .with("u.age[>=]", min_age)
                .with("u.name", names)
                .group(
                    "OR",
                    ConditionMap::new()
                        .with("r.name[~]", "adm")
                        .with("u.deleted", Value::Null),
                ),
        )
        .order_by(OrderItem::desc("u.id"))
        .limit(Limit::Range {
            offset: page.0,
            count: page.1,
        })
}

proptest! {
    #[test]
    fn compiling_twice_is_byte_identical(
        min_age in -1000i64..1000,
        names in prop::collection::vec("[a-z']{1,8}", 0..5),
        offset in 0u64..10_000,
        count in 1u64..500,
    ) {
        let spec = sample_spec(min_age, names, (offset, count));
        for dialect in [Dialect::Mysql, Dialect::Postgres, Dialect::Sqlite, Dialect::Oracle] {
            let builder = Builder::new(Config::new(dialect)).unwrap();
            let first = builder.select(&spec).unwrap();
            let second = builder.select(&spec).unwrap();
            prop_assert_eq!(&first, &second);

            let fresh = Builder::new(Config::new(dialect)).unwrap();
            prop_assert_eq!(first, fresh.select(&spec).unwrap());
        }
    }
}

#[test]
fn builders_with_different_configs_do_not_interfere() {
    let spec = QuerySpec::new("t").conditions(ConditionMap::new().with("p", r"a\b"));
    let mysql = Builder::new(Config::new(Dialect::Mysql).with_prefix("x_")).unwrap();
    let postgres = Builder::new(Config::new(Dialect::Postgres)).unwrap();

    let before = postgres.select(&spec).unwrap();
    let _ = mysql.select(&spec).unwrap();
    assert_eq!(postgres.select(&spec).unwrap(), before);
    assert_eq!(before, r#"SELECT * FROM "t" WHERE "p" = 'a\b'"#);
    assert_eq!(
        mysql.select(&spec).unwrap(),
        r#"SELECT * FROM "x_t" WHERE "p" = 'a\\b'"#
    );
}

#[test]
fn shared_builder_gives_same_output_across_threads() {
    let builder = Builder::new(Config::new(Dialect::Postgres)).unwrap();
    let specs: Vec<QuerySpec> = (0..8)
        .map(|i| sample_spec(i, vec![format!("n{i}")], (i as u64, 10)))
        .collect();
    let expected: Vec<String> = specs.iter().map(|s| builder.select(s).unwrap()).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    (0..50)
                        .map(|_| {
                            specs
                                .iter()
                                .map(|s| builder.select(s).unwrap())
                                .collect::<Vec<_>>()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            for round in handle.join().unwrap() {
                assert_eq!(round, expected);
            }
        }
    });
}
