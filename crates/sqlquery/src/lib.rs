//! # sqlquery
//!
//! A cross-dialect SQL query builder. Builders assemble SELECT, INSERT,
//! UPDATE and DELETE statements into SQL text plus a map of bind values.
//! Nothing is executed.
//!
//! ## Features
//!
//! - **Five dialects**: Common (ANSI), MySQL, PostgreSQL, SQLite, SQL Server
//! - **Named placeholders everywhere**: inline `?` values become `:_1_`, `:_2_`, ...
//!   so the bind map is correct whatever order clauses render in
//! - **Identifier quoting**: `t1.c1` becomes `"t1"."c1"` (or `` `t1`.`c1` ``, `[t1].[c1]`)
//! - **Sub-selects**: embedded builders merge their bind values into the parent
//! - **Dialect flags and paging**: `DISTINCT`, MySQL priority flags, SQLite
//!   `OR REPLACE`, `LIMIT/OFFSET` or `TOP`/`OFFSET ... FETCH`
//!
//! ## Example
//!
//! ```
//! use sqlquery::{Dialect, JoinKind, QueryFactory, SqlQuery};
//! use serde_json::json;
//!
//! let factory = QueryFactory::new(Dialect::Common);
//! let mut select = factory.new_select();
//! select
//!     .cols(["t1.id", "COUNT(t2.id) AS n"])
//!     .from("t1")
//!     .join(JoinKind::Left, "t2", "t2.t1_id = t1.id")
//!     .and_where("t1.kind IN (?)", ["a", "b"])
//!     .group_by(["t1.id"])
//!     .page(2);
//!
//! let built = select.build().unwrap();
//! assert_eq!(
//!     built.sql,
//!     "SELECT\n    \"t1\".\"id\",\n    COUNT(\"t2\".\"id\") AS n\n\
//!      FROM\n    \"t1\"\nLEFT JOIN \"t2\" ON \"t2\".\"t1_id\" = \"t1\".\"id\"\n\
//!      WHERE\n    \"t1\".\"kind\" IN (:_1_)\n\
//!      GROUP BY\n    \"t1\".\"id\"\n\
//!      LIMIT 10 OFFSET 10"
//! );
//! assert_eq!(serde_json::to_value(&built.binds).unwrap(), json!({"_1_": ["a", "b"]}));
//! ```
//!
//! ## Errors
//!
//! Mutators that usually sit inside long chains (`and_where`, `join_bind`,
//! `from_sub_select`, ...) record the first error on the builder; `build()`
//! returns it. Mutators that depend on the dialect (`set_flag`, `returning`,
//! UPDATE/DELETE `limit`) fail immediately.

pub mod bind;
pub mod columns;
pub mod condition;
pub mod config;
pub mod dialect;
pub mod error;
pub mod factory;
pub mod flags;
pub mod fragment;
pub mod from;
pub mod paging;
pub mod query;
pub mod quote;

pub use bind::{BindCollision, BindKey, BindRegister, BindValues, IntoBinds, Value};
pub use columns::{ColumnValue, ColumnValues};
pub use config::QueryConfig;
pub use dialect::{Dialect, DialectProfile, StatementKind};
pub use error::{QueryError, QueryResult};
pub use factory::QueryFactory;
pub use flags::Flag;
pub use fragment::Fragment;
pub use from::{JoinKind, SubSelect};
pub use paging::{MutationPaging, PaginationStyle};
pub use query::{BuiltQuery, Delete, Insert, Select, SqlQuery, Update};
pub use quote::Quoter;
