//! Example rendering the same queries for every dialect.
//!
//! Run with:
//!   cargo run --example dialects -p sqlquery
//!
//! Optional: pass a TOML config path to override the defaults
//! (`default_page_size`, `bind_collision`, ...).

use sqlquery::{Dialect, JoinKind, QueryConfig, QueryFactory, QueryResult, SqlQuery};
use std::env;

fn list_orders(factory: &QueryFactory, customer_id: i64, page: u64) -> QueryResult<String> {
    let mut recent = factory.new_select();
    recent
        .cols(["o.customer_id", "MAX(o.placed_at) AS last_order"])
        .from("orders AS o")
        .and_where("o.status <> ?", "cancelled")
        .group_by(["o.customer_id"]);

    let mut select = factory.new_select();
    select
        .cols(["c.id", "c.name", "r.last_order"])
        .from("customers AS c")
        .join_sub_select(JoinKind::Left, &recent, "r", "r.customer_id = c.id")
        .and_where("c.id = ?", customer_id)
        .order_by(["r.last_order DESC"])
        .page(page);

    Ok(select.build()?.to_string())
}

fn touch_customer(factory: &QueryFactory, customer_id: i64) -> QueryResult<String> {
    let mut update = factory.new_update();
    update
        .table("customers")
        .set("updated_at", "CURRENT_TIMESTAMP")
        .value("note", "visited")
        .and_where("id = ?", customer_id);
    let built = update.build()?;
    Ok(format!("{}\n-- binds: {}", built.sql, serde_json::to_string(&built.binds).unwrap_or_default()))
}

fn main() -> anyhow::Result<()> {
    let base = match env::args().nth(1) {
        Some(path) => QueryConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => QueryConfig::new(),
    };

    for dialect in [
        Dialect::Common,
        Dialect::Mysql,
        Dialect::Pgsql,
        Dialect::Sqlite,
        Dialect::Sqlsrv,
    ] {
        let factory = QueryFactory::from_config(base.clone().with_dialect(dialect));
        println!("== {dialect} ==");
        println!("{}\n", list_orders(&factory, 42, 2)?);
        println!("{}\n", touch_customer(&factory, 42)?);
    }

    Ok(())
}
