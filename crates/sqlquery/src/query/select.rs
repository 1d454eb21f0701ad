//! SELECT query builder.

use crate::bind::{BindValues, IntoBinds, Value};
use crate::condition::ConditionClause;
use crate::config::QueryConfig;
use crate::dialect::{Dialect, StatementKind};
use crate::error::QueryResult;
use crate::flags::Flag;
use crate::fragment::Fragment;
use crate::from::{FromList, JoinKind, SubSelect, join_condition, join_fragment, sub_select_fragment};
use crate::paging::Paging;
use crate::query::base::{QueryBase, render_names};
use crate::query::{BuiltQuery, SqlQuery};

/// SELECT query builder.
///
/// ```
/// use sqlquery::{Dialect, QueryFactory, SqlQuery};
///
/// let factory = QueryFactory::new(Dialect::Pgsql);
/// let mut select = factory.new_select();
/// select
///     .cols(["u.id", "u.name"])
///     .from("users AS u")
///     .and_where("u.status = ?", "active")
///     .order_by(["u.name"])
///     .limit(20);
///
/// let built = select.build().unwrap();
/// assert!(built.sql.starts_with("SELECT\n    \"u\".\"id\""));
/// assert_eq!(built.binds.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Select {
    base: QueryBase,
    /// Finished UNION segments with the separator that follows each.
    unions: Vec<(Fragment, &'static str)>,
    cols: Vec<String>,
    from: FromList,
    where_clause: ConditionClause,
    group_by: Vec<String>,
    having: ConditionClause,
    order_by: Vec<String>,
    paging: Paging,
    for_update: bool,
}

impl Select {
    /// Create a SELECT for the dialect and settings in `config`.
    pub fn new(config: &QueryConfig) -> Self {
        let base = QueryBase::new(StatementKind::Select, config);
        let paging = base.new_paging();
        Self {
            base,
            unions: Vec::new(),
            cols: Vec::new(),
            from: FromList::new(),
            where_clause: ConditionClause::new(),
            group_by: Vec::new(),
            having: ConditionClause::new(),
            order_by: Vec::new(),
            paging,
            for_update: false,
        }
    }

    /// Create a SELECT with default settings for `dialect`.
    pub fn with_dialect(dialect: Dialect) -> Self {
        Self::new(&QueryConfig::new().with_dialect(dialect))
    }

    // ==================== Flags ====================

    /// Add or remove `DISTINCT`.
    pub fn distinct(&mut self, enable: bool) -> &mut Self {
        let result = self.base.set_flag(Flag::Distinct, enable);
        self.base.record(result);
        self
    }

    /// Enable or disable a dialect-specific SELECT flag.
    pub fn set_flag(&mut self, flag: Flag, enable: bool) -> QueryResult<&mut Self> {
        self.base.set_flag(flag, enable)?;
        Ok(self)
    }

    /// Check whether a flag is enabled on the current segment.
    pub fn has_flag(&self, flag: Flag) -> bool {
        self.base.flags.is_set(flag)
    }

    // ==================== Columns ====================

    /// Append columns. Dotted names are quoted; expressions are kept.
    pub fn cols<I, S>(&mut self, cols: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for col in cols {
            let col = col.as_ref().trim();
            if !col.is_empty() {
                self.cols.push(self.base.quoter.quote_names_in(col));
            }
        }
        self
    }

    /// Check whether any column has been selected in the current segment.
    pub fn has_cols(&self) -> bool {
        !self.cols.is_empty()
    }

    // ==================== FROM ====================

    /// Add a FROM table (`t1`, `t1 AS a1`, `schema.t1`) and make it current.
    pub fn from(&mut self, spec: &str) -> &mut Self {
        let quoted = self.base.quoter.quote_name(spec);
        self.from.add_from(Fragment::text(quoted));
        self
    }

    /// Add a FROM entry emitted verbatim.
    pub fn from_raw(&mut self, spec: &str) -> &mut Self {
        self.from.add_from(Fragment::text(spec.trim()));
        self
    }

    /// Add a sub-select as a FROM entry.
    ///
    /// A [`Select`] is rendered now; its bind values move into this query.
    pub fn from_sub_select(&mut self, sub: impl Into<SubSelect>, alias: &str) -> &mut Self {
        let result = self.sub_select(sub.into(), alias);
        if let Some(fragment) = self.base.record(result) {
            self.from.add_from(fragment);
        }
        self
    }

    fn sub_select(&mut self, sub: SubSelect, alias: &str) -> QueryResult<Fragment> {
        let body = match sub {
            SubSelect::Raw(sql) => Fragment::text(sql.trim()),
            SubSelect::Query(query) => {
                let (fragment, binds) = query.render()?;
                self.base.register.absorb(&fragment, &binds)?
            }
        };
        let alias = self.base.quoter.quote_name(alias);
        Ok(sub_select_fragment(&body, &alias))
    }

    // ==================== JOIN ====================

    /// Join a table to the current FROM entry.
    ///
    /// `on` may be empty, start with `ON`/`USING`, or be a bare condition.
    pub fn join(&mut self, kind: JoinKind, spec: &str, on: &str) -> &mut Self {
        self.join_bind(kind, spec, on, ())
    }

    /// Join with values bound to the `?` placeholders of `on`.
    pub fn join_bind(&mut self, kind: JoinKind, spec: &str, on: &str, binds: impl IntoBinds) -> &mut Self {
        let target = Fragment::text(self.base.quoter.quote_name(spec));
        let result = self.join_on(on, binds);
        if let Some(condition) = self.base.record(result) {
            self.from
                .add_join(join_fragment(kind, &target, condition.as_ref()));
        }
        self
    }

    pub fn inner_join(&mut self, spec: &str, on: &str) -> &mut Self {
        self.join(JoinKind::Inner, spec, on)
    }

    pub fn left_join(&mut self, spec: &str, on: &str) -> &mut Self {
        self.join(JoinKind::Left, spec, on)
    }

    /// Join a sub-select to the current FROM entry.
    pub fn join_sub_select(
        &mut self,
        kind: JoinKind,
        sub: impl Into<SubSelect>,
        alias: &str,
        on: &str,
    ) -> &mut Self {
        self.join_sub_select_bind(kind, sub, alias, on, ())
    }

    /// Join a sub-select with values bound to the `?` placeholders of `on`.
    ///
    /// The sub-select's own values are bound first, then the ON values.
    pub fn join_sub_select_bind(
        &mut self,
        kind: JoinKind,
        sub: impl Into<SubSelect>,
        alias: &str,
        on: &str,
        binds: impl IntoBinds,
    ) -> &mut Self {
        let result = match self.sub_select(sub.into(), alias) {
            Ok(target) => self.join_on(on, binds).map(|condition| (target, condition)),
            Err(err) => Err(err),
        };
        if let Some((target, condition)) = self.base.record(result) {
            self.from
                .add_join(join_fragment(kind, &target, condition.as_ref()));
        }
        self
    }

    fn join_on(&mut self, on: &str, binds: impl IntoBinds) -> QueryResult<Option<Fragment>> {
        let text = join_condition(on).unwrap_or_default();
        let fragment = self.base.condition(&text, binds)?;
        Ok((!fragment.is_empty()).then_some(fragment))
    }

    // ==================== WHERE / HAVING ====================

    /// Add a WHERE condition joined with AND.
    pub fn and_where(&mut self, cond: &str, binds: impl IntoBinds) -> &mut Self {
        let result = self.base.condition(cond, binds);
        if let Some(fragment) = self.base.record(result) {
            self.where_clause.add_and(fragment);
        }
        self
    }

    /// Add a WHERE condition joined with OR.
    pub fn or_where(&mut self, cond: &str, binds: impl IntoBinds) -> &mut Self {
        let result = self.base.condition(cond, binds);
        if let Some(fragment) = self.base.record(result) {
            self.where_clause.add_or(fragment);
        }
        self
    }

    /// Add a HAVING condition joined with AND.
    pub fn having(&mut self, cond: &str, binds: impl IntoBinds) -> &mut Self {
        let result = self.base.condition(cond, binds);
        if let Some(fragment) = self.base.record(result) {
            self.having.add_and(fragment);
        }
        self
    }

    /// Add a HAVING condition joined with OR.
    pub fn or_having(&mut self, cond: &str, binds: impl IntoBinds) -> &mut Self {
        let result = self.base.condition(cond, binds);
        if let Some(fragment) = self.base.record(result) {
            self.having.add_or(fragment);
        }
        self
    }

    // ==================== GROUP BY / ORDER BY ====================

    pub fn group_by<I, S>(&mut self, specs: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for spec in specs {
            self.group_by.push(self.base.quoter.quote_names_in(spec.as_ref().trim()));
        }
        self
    }

    pub fn order_by<I, S>(&mut self, specs: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for spec in specs {
            self.order_by.push(self.base.quoter.quote_names_in(spec.as_ref().trim()));
        }
        self
    }

    // ==================== Paging ====================

    /// Set LIMIT (`0` means none).
    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.paging.set_limit(limit);
        self
    }

    /// Set OFFSET (`0` means none).
    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.paging.set_offset(offset);
        self
    }

    /// Select a 1-based page using the current page size. `page(0)` clears
    /// limit and offset.
    pub fn page(&mut self, page: u64) -> &mut Self {
        self.paging.set_page(page);
        self
    }

    /// Set the page size used by later `page()` calls.
    pub fn set_paging(&mut self, page_size: u64) -> &mut Self {
        self.paging.set_page_size(page_size);
        self
    }

    /// Current page size.
    pub fn paging(&self) -> u64 {
        self.paging.page_size()
    }

    pub fn get_limit(&self) -> u64 {
        self.paging.limit()
    }

    pub fn get_offset(&self) -> u64 {
        self.paging.offset()
    }

    // ==================== Misc ====================

    /// Add or remove `FOR UPDATE`.
    pub fn for_update(&mut self, enable: bool) -> &mut Self {
        self.for_update = enable;
        self
    }

    /// Finish the current segment and start a new one after `UNION`.
    pub fn union(&mut self) -> &mut Self {
        self.push_union("\nUNION\n")
    }

    /// Finish the current segment and start a new one after `UNION ALL`.
    pub fn union_all(&mut self) -> &mut Self {
        self.push_union("\nUNION ALL\n")
    }

    fn push_union(&mut self, separator: &'static str) -> &mut Self {
        let segment = self.render_segment();
        self.unions.push((segment, separator));

        self.cols.clear();
        self.from.clear();
        self.where_clause.clear();
        self.group_by.clear();
        self.having.clear();
        self.order_by.clear();
        self.paging.reset();
        self.base.flags.clear();
        self.for_update = false;
        self
    }

    /// Bind a value to a named placeholder (`c1` or `:c1`).
    pub fn bind_value(&mut self, name: &str, value: impl Into<Value>) -> QueryResult<&mut Self> {
        self.base.bind_value(name, value)?;
        Ok(self)
    }

    /// Bind several named values in order.
    pub fn bind_values<K, V>(&mut self, values: impl IntoIterator<Item = (K, V)>) -> QueryResult<&mut Self>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.base.bind_values(values)?;
        Ok(self)
    }

    // ==================== Rendering ====================

    /// Render every segment, without logging.
    pub(crate) fn render(&self) -> QueryResult<(Fragment, BindValues)> {
        self.base.check()?;
        let mut out = Fragment::new();
        for (segment, separator) in &self.unions {
            out.append(segment).push_str(separator);
        }
        out.append(&self.render_segment());
        Ok((out, self.base.values()))
    }

    fn render_segment(&self) -> Fragment {
        let style = self.base.profile.pagination;
        let top = self.paging.prefix(style);
        let mut out = Fragment::text(self.base.head(top.as_deref()));

        if !self.cols.is_empty() {
            out.push_str("\n    ").push_str(&self.cols.join(",\n    "));
        }
        self.from.render(&mut out);
        self.where_clause.render("WHERE", &mut out);
        render_names("GROUP BY", &self.group_by, &mut out);
        self.having.render("HAVING", &mut out);
        render_names("ORDER BY", &self.order_by, &mut out);
        if let Some(clause) = self.paging.suffix(style) {
            out.push_str("\n").push_str(&clause);
        }
        if self.for_update {
            out.push_str("\nFOR UPDATE");
        }
        out
    }
}

impl SqlQuery for Select {
    fn build(&self) -> QueryResult<BuiltQuery> {
        let (fragment, binds) = self.render()?;
        let sql = fragment.to_sql();
        self.base.log_build(&sql, &binds);
        Ok(BuiltQuery::new(sql, binds))
    }

    fn bind_values_map(&self) -> BindValues {
        self.base.values()
    }

    fn statement(&self) -> StatementKind {
        StatementKind::Select
    }

    fn dialect(&self) -> Dialect {
        self.base.dialect()
    }
}
