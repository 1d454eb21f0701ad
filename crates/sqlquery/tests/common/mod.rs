#![allow(dead_code)]

use sqlquery::{Dialect, QueryConfig, QueryFactory};

pub const DIALECTS: [Dialect; 5] = [
    Dialect::Common,
    Dialect::Mysql,
    Dialect::Pgsql,
    Dialect::Sqlite,
    Dialect::Sqlsrv,
];

pub fn factory(dialect: Dialect) -> QueryFactory {
    QueryFactory::from_config(QueryConfig::new().with_dialect(dialect))
}

/// Collapse whitespace runs, drop padding inside parentheses and swap
/// `<<`/`>>` for the dialect's quotes.
pub fn normalize(dialect: Dialect, sql: &str) -> String {
    let profile = dialect.profile();
    sql.replace("<<", profile.quote_prefix)
        .replace(">>", profile.quote_suffix)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("( ", "(")
        .replace(" )", ")")
}

#[track_caller]
pub fn assert_same_sql(dialect: Dialect, expect: &str, actual: &str) {
    assert_eq!(
        normalize(dialect, expect),
        normalize(dialect, actual),
        "\n--- expected ---\n{expect}\n--- actual ---\n{actual}\n"
    );
}
