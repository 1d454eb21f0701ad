//! UPDATE query builder.

use crate::bind::{BindValues, IntoBinds, Value};
use crate::columns::{ColumnValue, ColumnValues};
use crate::condition::ConditionClause;
use crate::config::QueryConfig;
use crate::dialect::{Dialect, StatementKind};
use crate::error::{QueryError, QueryResult};
use crate::flags::Flag;
use crate::fragment::Fragment;
use crate::paging::{PaginationStyle, Paging};
use crate::query::base::{QueryBase, render_names};
use crate::query::{BuiltQuery, SqlQuery};

/// UPDATE query builder.
///
/// ORDER BY, LIMIT and OFFSET are only accepted where the dialect allows
/// them on UPDATE (MySQL: ORDER BY + LIMIT, SQLite: all three).
#[derive(Debug, Clone)]
pub struct Update {
    base: QueryBase,
    table: Option<String>,
    values: ColumnValues,
    where_clause: ConditionClause,
    order_by: Vec<String>,
    paging: Paging,
    returning: Vec<String>,
}

impl Update {
    pub fn new(config: &QueryConfig) -> Self {
        let base = QueryBase::new(StatementKind::Update, config);
        let paging = base.new_paging();
        Self {
            base,
            table: None,
            values: ColumnValues::new(),
            where_clause: ConditionClause::new(),
            order_by: Vec::new(),
            paging,
            returning: Vec::new(),
        }
    }

    pub fn with_dialect(dialect: Dialect) -> Self {
        Self::new(&QueryConfig::new().with_dialect(dialect))
    }

    /// Set the target table.
    pub fn table(&mut self, table: &str) -> &mut Self {
        self.table = Some(self.base.quoter.quote_name(table));
        self
    }

    pub fn set_flag(&mut self, flag: Flag, enable: bool) -> QueryResult<&mut Self> {
        self.base.set_flag(flag, enable)?;
        Ok(self)
    }

    // ==================== SET ====================

    /// Add `col = :col` assignments, bound later by the caller.
    pub fn cols<I, S>(&mut self, cols: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for col in cols {
            let col = col.as_ref().trim();
            self.assign(col, ColumnValue::placeholder(col));
        }
        self
    }

    /// Assign raw SQL (`c2 = c2 + 1`).
    pub fn set(&mut self, col: &str, raw: &str) -> &mut Self {
        self.assign(col, ColumnValue::Raw(raw.trim().to_string()));
        self
    }

    pub fn set_null(&mut self, col: &str) -> &mut Self {
        self.assign(col, ColumnValue::Null);
        self
    }

    /// Assign `:col` and bind `value` to it.
    pub fn value(&mut self, col: &str, value: impl Into<Value>) -> &mut Self {
        let col = col.trim();
        let result = self.base.bind_value(col, value);
        if self.base.record(result).is_some() {
            self.values.set_bound(col);
        }
        self
    }

    fn assign(&mut self, col: &str, value: ColumnValue) {
        if let Some(released) = self.values.set(col, value) {
            self.base.register.unbind_named(&released);
        }
    }

    // ==================== WHERE ====================

    pub fn and_where(&mut self, cond: &str, binds: impl IntoBinds) -> &mut Self {
        let result = self.base.condition(cond, binds);
        if let Some(fragment) = self.base.record(result) {
            self.where_clause.add_and(fragment);
        }
        self
    }

    pub fn or_where(&mut self, cond: &str, binds: impl IntoBinds) -> &mut Self {
        let result = self.base.condition(cond, binds);
        if let Some(fragment) = self.base.record(result) {
            self.where_clause.add_or(fragment);
        }
        self
    }

    // ==================== ORDER BY / LIMIT / OFFSET ====================

    pub fn order_by<I, S>(&mut self, specs: I) -> QueryResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = self.base.profile.mutation_paging.allows_limit();
        self.base.require_mutation_paging("ORDER BY", allowed)?;
        for spec in specs {
            self.order_by.push(self.base.quoter.quote_names_in(spec.as_ref().trim()));
        }
        Ok(self)
    }

    pub fn limit(&mut self, limit: u64) -> QueryResult<&mut Self> {
        let allowed = self.base.profile.mutation_paging.allows_limit();
        self.base.require_mutation_paging("LIMIT", allowed)?;
        self.paging.set_limit(limit);
        Ok(self)
    }

    pub fn offset(&mut self, offset: u64) -> QueryResult<&mut Self> {
        let allowed = self.base.profile.mutation_paging.allows_offset();
        self.base.require_mutation_paging("OFFSET", allowed)?;
        self.paging.set_offset(offset);
        Ok(self)
    }

    pub fn returning<I, S>(&mut self, cols: I) -> QueryResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.base.profile.require_returning()?;
        for col in cols {
            self.returning.push(self.base.quoter.quote_names_in(col.as_ref().trim()));
        }
        Ok(self)
    }

    pub fn bind_value(&mut self, name: &str, value: impl Into<Value>) -> QueryResult<&mut Self> {
        self.base.bind_value(name, value)?;
        Ok(self)
    }

    pub fn bind_values<K, V>(&mut self, values: impl IntoIterator<Item = (K, V)>) -> QueryResult<&mut Self>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.base.bind_values(values)?;
        Ok(self)
    }

    fn render(&self) -> QueryResult<Fragment> {
        self.base.check()?;
        let table = self
            .table
            .as_deref()
            .ok_or(QueryError::MissingTable { statement: "UPDATE" })?;
        if self.values.is_empty() {
            return Err(QueryError::EmptySet);
        }

        let assignments: Vec<String> = self
            .values
            .iter()
            .map(|(col, value)| format!("{} = {}", self.base.quoter.quote_name(col), value))
            .collect();

        let mut out = Fragment::text(self.base.head(None));
        out.push_str(" ")
            .push_str(table)
            .push_str("\nSET\n    ")
            .push_str(&assignments.join(",\n    "));
        self.where_clause.render("WHERE", &mut out);
        render_names("ORDER BY", &self.order_by, &mut out);
        if let Some(clause) = self.paging.suffix(PaginationStyle::LimitOffset) {
            out.push_str("\n").push_str(&clause);
        }
        render_names("RETURNING", &self.returning, &mut out);
        Ok(out)
    }
}

impl SqlQuery for Update {
    fn build(&self) -> QueryResult<BuiltQuery> {
        let sql = self.render()?.to_sql();
        let binds = self.base.values();
        self.base.log_build(&sql, &binds);
        Ok(BuiltQuery::new(sql, binds))
    }

    fn bind_values_map(&self) -> BindValues {
        self.base.values()
    }

    fn statement(&self) -> StatementKind {
        StatementKind::Update
    }

    fn dialect(&self) -> Dialect {
        self.base.dialect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_layout() {
        let mut q = Update::with_dialect(Dialect::Common);
        q.table("t1")
            .cols(["c1", "c2"])
            .set("c3", "NOW()")
            .set_null("c4")
            .and_where("foo = ?", "bar")
            .or_where("zim = gir", ());
        assert_eq!(
            q.to_sql().unwrap(),
            "UPDATE \"t1\"\nSET\n    \"c1\" = :c1,\n    \"c2\" = :c2,\n    \"c3\" = NOW(),\n    \"c4\" = NULL\nWHERE\n    foo = :_1_\n    OR zim = gir"
        );
    }

    #[test]
    fn test_reassigned_value_drops_its_bind() {
        let mut q = Update::with_dialect(Dialect::Common);
        q.table("t1")
            .value("c1", 1)
            .value("c2", 2)
            .value("c3", 3)
            .set_null("c2")
            .and_where("id = ?", 9);
        let built = q.build().unwrap();
        assert_eq!(
            built.sql,
            "UPDATE \"t1\"\nSET\n    \"c1\" = :c1,\n    \"c2\" = NULL,\n    \"c3\" = :c3\nWHERE\n    id = :_1_"
        );
        let keys: Vec<String> = built.binds.keys().map(|k| k.name()).collect();
        assert_eq!(keys, vec!["c1", "c3", "_1_"]);

        // Re-adding the placeholder keeps the existing bind.
        let mut q = Update::with_dialect(Dialect::Common);
        q.table("t1").value("c1", 1).cols(["c1"]);
        assert_eq!(q.build().unwrap().binds.get_named("c1"), Some(&json!(1)));
    }

    #[test]
    fn test_empty_set_and_missing_table() {
        let q = Update::with_dialect(Dialect::Common);
        assert!(q.build().unwrap_err().is_missing_table());

        let mut q = Update::with_dialect(Dialect::Common);
        q.table("t1");
        assert_eq!(q.build().unwrap_err(), QueryError::EmptySet);
    }

    #[test]
    fn test_limit_rejected_without_support() {
        let mut q = Update::with_dialect(Dialect::Pgsql);
        assert!(q.limit(10).unwrap_err().is_unsupported());
        assert!(q.order_by(["id"]).unwrap_err().is_unsupported());
    }

    #[test]
    fn test_sqlite_order_limit_offset() {
        let mut q = Update::with_dialect(Dialect::Sqlite);
        q.table("t1").value("c1", 1);
        q.order_by(["t1.id"]).unwrap().limit(10).unwrap().offset(20).unwrap();
        let built = q.build().unwrap();
        assert_eq!(
            built.sql,
            "UPDATE \"t1\"\nSET\n    \"c1\" = :c1\nORDER BY\n    \"t1\".\"id\"\nLIMIT 10 OFFSET 20"
        );
        assert_eq!(built.binds.get_named("c1"), Some(&json!(1)));
    }

    #[test]
    fn test_mysql_offset_rejected() {
        let mut q = Update::with_dialect(Dialect::Mysql);
        q.limit(5).unwrap();
        let err = q.offset(5).unwrap_err();
        assert_eq!(err.to_string(), "MySQL does not support OFFSET on UPDATE");
    }
}
