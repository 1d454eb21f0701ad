//! INSERT query builder.

use crate::bind::{BindValues, Value};
use crate::columns::{ColumnValue, ColumnValues};
use crate::config::QueryConfig;
use crate::dialect::{Dialect, StatementKind};
use crate::error::{QueryError, QueryResult};
use crate::flags::Flag;
use crate::fragment::Fragment;
use crate::query::base::{QueryBase, render_names};
use crate::query::{BuiltQuery, SqlQuery};

/// INSERT query builder.
#[derive(Debug, Clone)]
pub struct Insert {
    base: QueryBase,
    table: Option<String>,
    values: ColumnValues,
    returning: Vec<String>,
}

impl Insert {
    pub fn new(config: &QueryConfig) -> Self {
        Self {
            base: QueryBase::new(StatementKind::Insert, config),
            table: None,
            values: ColumnValues::new(),
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

    /// Enable or disable a dialect-specific INSERT flag.
    pub fn set_flag(&mut self, flag: Flag, enable: bool) -> QueryResult<&mut Self> {
        self.base.set_flag(flag, enable)?;
        Ok(self)
    }

    // ==================== Values ====================

    /// Add columns with `:col` placeholders, bound later by the caller.
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

    /// Set a column to raw SQL, emitted verbatim.
    pub fn set(&mut self, col: &str, raw: &str) -> &mut Self {
        self.assign(col, ColumnValue::Raw(raw.trim().to_string()));
        self
    }

    /// Set a column to `NULL`.
    pub fn set_null(&mut self, col: &str) -> &mut Self {
        self.assign(col, ColumnValue::Null);
        self
    }

    /// Add a `:col` placeholder and bind `value` to it.
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

    /// Add a RETURNING clause.
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
            .ok_or(QueryError::MissingTable { statement: "INSERT" })?;

        let mut out = Fragment::text(self.base.head(Some("INTO")));
        out.push_str(" ").push_str(table);

        if self.values.is_empty() {
            out.push_str(" ").push_str(self.base.profile.empty_insert);
        } else {
            let (cols, vals): (Vec<String>, Vec<String>) = self
                .values
                .iter()
                .map(|(col, value)| (self.base.quoter.quote_name(col), value.to_string()))
                .unzip();
            out.push_str(" (\n    ")
                .push_str(&cols.join(",\n    "))
                .push_str("\n) VALUES (\n    ")
                .push_str(&vals.join(",\n    "))
                .push_str("\n)");
        }

        render_names("RETURNING", &self.returning, &mut out);
        Ok(out)
    }
}

impl SqlQuery for Insert {
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
        StatementKind::Insert
    }

    fn dialect(&self) -> Dialect {
        self.base.dialect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::BindCollision;
    use serde_json::json;

    #[test]
    fn test_missing_table() {
        let mut q = Insert::with_dialect(Dialect::Common);
        q.cols(["c1"]);
        assert!(q.build().unwrap_err().is_missing_table());
    }

    #[test]
    fn test_columns_and_values() {
        let mut q = Insert::with_dialect(Dialect::Common);
        q.table("t1").cols(["c1", "c2"]).set("c3", "NOW()").set_null("c4");
        assert_eq!(
            q.to_sql().unwrap(),
            "INSERT INTO \"t1\" (\n    \"c1\",\n    \"c2\",\n    \"c3\",\n    \"c4\"\n) VALUES (\n    :c1,\n    :c2,\n    NOW(),\n    NULL\n)"
        );
    }

    #[test]
    fn test_reset_column_in_place() {
        let mut q = Insert::with_dialect(Dialect::Common);
        q.table("t1").cols(["c1", "c2"]).set("c1", "DEFAULT");
        assert_eq!(
            q.to_sql().unwrap(),
            "INSERT INTO \"t1\" (\n    \"c1\",\n    \"c2\"\n) VALUES (\n    DEFAULT,\n    :c2\n)"
        );
    }

    #[test]
    fn test_value_binds_named() {
        let mut q = Insert::with_dialect(Dialect::Common);
        q.table("t1").value("c1", 3).value("c2", "x");
        let built = q.build().unwrap();
        assert_eq!(serde_json::to_value(&built.binds).unwrap(), json!({"c1": 3, "c2": "x"}));
    }

    #[test]
    fn test_reassigned_value_drops_its_bind() {
        let mut q = Insert::with_dialect(Dialect::Common);
        q.table("t1").value("c1", 3).value("c2", "x").set("c1", "NOW()");
        let built = q.build().unwrap();
        assert_eq!(
            built.sql,
            "INSERT INTO \"t1\" (\n    \"c1\",\n    \"c2\"\n) VALUES (\n    NOW(),\n    :c2\n)"
        );
        assert_eq!(serde_json::to_value(&built.binds).unwrap(), json!({"c2": "x"}));

        let mut q = Insert::with_dialect(Dialect::Common);
        q.table("t1").value("c1", 3).set_null("c1");
        assert!(q.build().unwrap().binds.is_empty());
    }

    #[test]
    fn test_value_collision_recorded() {
        let config = QueryConfig::new().with_bind_collision(BindCollision::Reject);
        let mut q = Insert::new(&config);
        q.table("t1").value("c1", 1).value("c1", 2);
        assert!(q.build().unwrap_err().is_duplicate_bind());
    }

    #[test]
    fn test_empty_insert() {
        let mut q = Insert::with_dialect(Dialect::Common);
        q.table("t1");
        assert_eq!(q.to_sql().unwrap(), "INSERT INTO \"t1\" DEFAULT VALUES");

        let mut q = Insert::with_dialect(Dialect::Mysql);
        q.table("t1");
        assert_eq!(q.to_sql().unwrap(), "INSERT INTO `t1` () VALUES ()");
    }

    #[test]
    fn test_returning_requires_support() {
        let mut q = Insert::with_dialect(Dialect::Common);
        assert!(q.returning(["id"]).unwrap_err().is_unsupported());

        let mut q = Insert::with_dialect(Dialect::Pgsql);
        q.table("t1").cols(["c1"]);
        q.returning(["id"]).unwrap();
        assert_eq!(
            q.to_sql().unwrap(),
            "INSERT INTO \"t1\" (\n    \"c1\"\n) VALUES (\n    :c1\n)\nRETURNING\n    id"
        );
    }
}
