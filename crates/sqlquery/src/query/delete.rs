//! DELETE query builder.

use crate::bind::{BindValues, IntoBinds, Value};
use crate::condition::ConditionClause;
use crate::config::QueryConfig;
use crate::dialect::{Dialect, StatementKind};
use crate::error::{QueryError, QueryResult};
use crate::flags::Flag;
use crate::fragment::Fragment;
use crate::paging::{PaginationStyle, Paging};
use crate::query::base::{QueryBase, render_names};
use crate::query::{BuiltQuery, SqlQuery};

/// DELETE query builder.
#[derive(Debug, Clone)]
pub struct Delete {
    base: QueryBase,
    table: Option<String>,
    where_clause: ConditionClause,
    order_by: Vec<String>,
    paging: Paging,
    returning: Vec<String>,
}

impl Delete {
    pub fn new(config: &QueryConfig) -> Self {
        let base = QueryBase::new(StatementKind::Delete, config);
        let paging = base.new_paging();
        Self {
            base,
            table: None,
            where_clause: ConditionClause::new(),
            order_by: Vec::new(),
            paging,
            returning: Vec::new(),
        }
    }

    pub fn with_dialect(dialect: Dialect) -> Self {
        Self::new(&QueryConfig::new().with_dialect(dialect))
    }

    /// Set the table to delete from.
    pub fn from(&mut self, table: &str) -> &mut Self {
        self.table = Some(self.base.quoter.quote_name(table));
        self
    }

    pub fn set_flag(&mut self, flag: Flag, enable: bool) -> QueryResult<&mut Self> {
        self.base.set_flag(flag, enable)?;
        Ok(self)
    }

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
            .ok_or(QueryError::MissingTable { statement: "DELETE" })?;

        let mut out = Fragment::text(self.base.head(Some("FROM")));
        out.push_str(" ").push_str(table);
        self.where_clause.render("WHERE", &mut out);
        render_names("ORDER BY", &self.order_by, &mut out);
        if let Some(clause) = self.paging.suffix(PaginationStyle::LimitOffset) {
            out.push_str("\n").push_str(&clause);
        }
        render_names("RETURNING", &self.returning, &mut out);
        Ok(out)
    }
}

impl SqlQuery for Delete {
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
        StatementKind::Delete
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
    fn test_delete_layout() {
        let mut q = Delete::with_dialect(Dialect::Common);
        q.from("t1")
            .and_where("foo = ?", "bar")
            .and_where("baz = ?", "dib")
            .or_where("zim = gir", ());
        let built = q.build().unwrap();
        assert_eq!(
            built.sql,
            "DELETE FROM \"t1\"\nWHERE\n    foo = :_1_\n    AND baz = :_2_\n    OR zim = gir"
        );
        assert_eq!(
            serde_json::to_value(&built.binds).unwrap(),
            json!({"_1_": "bar", "_2_": "dib"})
        );
    }

    #[test]
    fn test_delete_without_where_is_allowed() {
        let mut q = Delete::with_dialect(Dialect::Common);
        q.from("t1");
        assert_eq!(q.to_sql().unwrap(), "DELETE FROM \"t1\"");
    }

    #[test]
    fn test_mysql_flags_and_limit() {
        let mut q = Delete::with_dialect(Dialect::Mysql);
        q.from("t1").and_where("id > ?", 10);
        q.set_flag(Flag::LowPriority, true)
            .unwrap()
            .set_flag(Flag::Quick, true)
            .unwrap()
            .order_by(["id DESC"])
            .unwrap()
            .limit(5)
            .unwrap();
        assert_eq!(
            q.to_sql().unwrap(),
            "DELETE LOW_PRIORITY QUICK FROM `t1`\nWHERE\n    id > :_1_\nORDER BY\n    id DESC\nLIMIT 5"
        );
        assert!(q.offset(5).unwrap_err().is_unsupported());
    }

    #[test]
    fn test_pgsql_returning() {
        let mut q = Delete::with_dialect(Dialect::Pgsql);
        q.from("t1").and_where("t1.id = ?", 7);
        q.returning(["t1.id", "name"]).unwrap();
        assert_eq!(
            q.to_sql().unwrap(),
            "DELETE FROM \"t1\"\nWHERE\n    \"t1\".\"id\" = :_1_\nRETURNING\n    \"t1\".\"id\",\n    name"
        );
    }
}
