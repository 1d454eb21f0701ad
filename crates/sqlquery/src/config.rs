use crate::dialect::Dialect;
use crate::error::QueryResult;
use serde::Deserialize;

pub use crate::bind::BindCollision;

/// Configuration shared by the queries a [`QueryFactory`](crate::QueryFactory)
/// hands out.
///
/// Can be built in code with the `with_*` methods or read from TOML:
///
/// ```toml
/// dialect = "mysql"
/// default_page_size = 25
/// bind_collision = "reject"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryConfig {
    /// Target dialect.
    pub dialect: Dialect,
    /// Page size used by `page()` until `set_paging()` changes it.
    pub default_page_size: u64,
    /// Behaviour when a named bind key is bound twice.
    pub bind_collision: BindCollision,
    /// Truncate SQL in log events (in bytes). `None` means no truncation.
    pub max_log_sql_length: Option<usize>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Common,
            default_page_size: 10,
            bind_collision: BindCollision::Overwrite,
            max_log_sql_length: Some(200),
        }
    }
}

impl QueryConfig {
    /// Create a configuration with defaults (Common dialect, page size 10).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> QueryResult<Self> {
        let config: Self = toml::from_str(text)?;
        Ok(config.normalized())
    }

    /// Set the target dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the default page size (clamped to at least 1).
    pub fn with_default_page_size(mut self, page_size: u64) -> Self {
        self.default_page_size = page_size.max(1);
        self
    }

    pub fn with_bind_collision(mut self, collision: BindCollision) -> Self {
        self.bind_collision = collision;
        self
    }

    /// Set the maximum SQL length shown in log events.
    pub fn with_max_log_sql_length(mut self, len: usize) -> Self {
        self.max_log_sql_length = Some(len);
        self
    }

    /// Log full SQL text.
    pub fn no_log_truncate(mut self) -> Self {
        self.max_log_sql_length = None;
        self
    }

    fn normalized(mut self) -> Self {
        self.default_page_size = self.default_page_size.max(1);
        self
    }

    /// SQL text as it should appear in log events.
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn log_sql(&self, sql: &str) -> String {
        match self.max_log_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }
}

/// Cut `sql` to at most `max_bytes`, on a char boundary.
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
