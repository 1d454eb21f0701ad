//! Statement builders.
//!
//! Each builder owns one bind register and renders in a single pass:
//!
//! ```
//! use sqlquery::{Dialect, QueryFactory, SqlQuery};
//!
//! let factory = QueryFactory::new(Dialect::Mysql);
//!
//! let mut insert = factory.new_insert();
//! insert.table("users").cols(["name"]).value("status", "active");
//! insert.bind_value("name", "alice").unwrap();
//!
//! let built = insert.build().unwrap();
//! assert_eq!(
//!     built.sql,
//!     "INSERT INTO `users` (\n    `name`,\n    `status`\n) VALUES (\n    :name,\n    :status\n)"
//! );
//! assert_eq!(built.binds.len(), 2);
//! ```

mod base;
mod delete;
mod insert;
mod select;
mod update;


pub use delete::Delete;
pub use insert::Insert;
pub use select::Select;
pub use update::Update;

use crate::bind::BindValues;
use crate::dialect::{Dialect, StatementKind};
use crate::error::QueryResult;
use serde::Serialize;
use std::fmt;

/// The result of building a query: SQL text plus the values to bind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltQuery {
    pub sql: String,
    pub binds: BindValues,
}

impl BuiltQuery {
    pub fn new(sql: String, binds: BindValues) -> Self {
        Self { sql, binds }
    }
}

impl fmt::Display for BuiltQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Base trait for all statement builders.
pub trait SqlQuery {
    /// Render the SQL and collect its bind values.
    ///
    /// Returns the first error recorded by a chainable mutator, if any.
    fn build(&self) -> QueryResult<BuiltQuery>;

    /// Render the SQL string only.
    fn to_sql(&self) -> QueryResult<String> {
        self.build().map(|built| built.sql)
    }

    /// Bind values registered so far, in insertion order.
    fn bind_values_map(&self) -> BindValues;

    fn statement(&self) -> StatementKind;

    fn dialect(&self) -> Dialect;
}
