//! State shared by every statement builder.

use crate::bind::{BindRegister, BindValues, IntoBinds, Value};
use crate::config::QueryConfig;
use crate::dialect::{Dialect, DialectProfile, StatementKind};
use crate::error::{QueryError, QueryResult};
use crate::flags::{Flag, FlagSet};
use crate::fragment::Fragment;
use crate::paging::Paging;
use crate::quote::Quoter;

#[derive(Debug, Clone)]
pub(crate) struct QueryBase {
    pub(crate) kind: StatementKind,
    pub(crate) profile: &'static DialectProfile,
    pub(crate) config: QueryConfig,
    pub(crate) quoter: Quoter,
    pub(crate) register: BindRegister,
    pub(crate) flags: FlagSet,
    /// First error raised by a chainable mutator, returned by `build()`.
    build_error: Option<QueryError>,
}

impl QueryBase {
    pub(crate) fn new(kind: StatementKind, config: &QueryConfig) -> Self {
        let profile = config.dialect.profile();
        Self {
            kind,
            profile,
            config: config.clone(),
            quoter: Quoter::for_profile(profile),
            register: BindRegister::new(config.bind_collision),
            flags: FlagSet::new(profile.flags(kind), profile.name, kind.keyword()),
            build_error: None,
        }
    }

    pub(crate) fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    pub(crate) fn new_paging(&self) -> Paging {
        Paging::new(self.config.default_page_size)
    }

    pub(crate) fn set_flag(&mut self, flag: Flag, enabled: bool) -> QueryResult<()> {
        self.flags.set(flag, enabled)
    }

    /// Bind a named value. A leading `:` is accepted and dropped.
    pub(crate) fn bind_value(&mut self, name: &str, value: impl Into<Value>) -> QueryResult<()> {
        let name = name.trim().trim_start_matches(':');
        self.register.bind_named(name, value)?;
        Ok(())
    }

    pub(crate) fn bind_values<K, V>(&mut self, values: impl IntoIterator<Item = (K, V)>) -> QueryResult<()>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (name, value) in values {
            self.bind_value(name.as_ref(), value)?;
        }
        Ok(())
    }

    pub(crate) fn values(&self) -> BindValues {
        self.register.values().clone()
    }

    /// Quote the dotted names in `cond` and bind its inline values.
    pub(crate) fn condition(&mut self, cond: &str, binds: impl IntoBinds) -> QueryResult<Fragment> {
        let text = self.quoter.quote_names_in(cond.trim());
        self.register.bind_inline(&text, binds.into_binds())
    }

    /// Keep the result of a chainable mutator, recording its error if any.
    pub(crate) fn record<T>(&mut self, result: QueryResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    target: "sqlquery.query",
                    dialect = self.profile.name,
                    statement = self.kind.keyword(),
                    error = %err,
                    "query builder error recorded"
                );
                if self.build_error.is_none() {
                    self.build_error = Some(err);
                }
                None
            }
        }
    }

    /// Fail with the first recorded error.
    pub(crate) fn check(&self) -> QueryResult<()> {
        match &self.build_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// `KEYWORD[ flags][ extra]`
    pub(crate) fn head(&self, extra: Option<&str>) -> String {
        let mut head = self.kind.keyword().to_string();
        let flags = self.flags.render();
        if !flags.is_empty() {
            head.push(' ');
            head.push_str(&flags);
        }
        if let Some(extra) = extra {
            head.push(' ');
            head.push_str(extra);
        }
        head
    }

    /// Validate a mutation ORDER BY / LIMIT / OFFSET request against the dialect.
    pub(crate) fn require_mutation_paging(&self, feature: &str, allowed: bool) -> QueryResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(QueryError::unsupported(
                self.profile.name,
                format!("{feature} on {}", self.kind.keyword()),
            ))
        }
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub(crate) fn log_build(&self, sql: &str, binds: &BindValues) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlquery.build",
            dialect = self.profile.name,
            statement = self.kind.keyword(),
            binds = binds.len(),
            sql = %self.config.log_sql(sql),
            "built query"
        );
    }
}

/// Render `\n<header>\n    a,\n    b`, or nothing when empty.
pub(crate) fn render_names(header: &str, items: &[String], out: &mut Fragment) {
    if items.is_empty() {
        return;
    }
    out.push_str("\n")
        .push_str(header)
        .push_str("\n    ")
        .push_str(&items.join(",\n    "));
}
