use crate::config::QueryConfig;
use crate::dialect::Dialect;
use crate::error::QueryResult;
use crate::query::{Delete, Insert, Select, Update};

/// Hands out statement builders bound to one dialect and configuration.
#[derive(Debug, Clone, Default)]
pub struct QueryFactory {
    config: QueryConfig,
}

impl QueryFactory {
    /// Create a factory for `dialect` with default settings.
    pub fn new(dialect: Dialect) -> Self {
        Self::from_config(QueryConfig::new().with_dialect(dialect))
    }

    pub fn from_config(config: QueryConfig) -> Self {
        Self { config }
    }

    /// Create a factory from a TOML configuration document.
    pub fn from_toml_str(text: &str) -> QueryResult<Self> {
        Ok(Self::from_config(QueryConfig::from_toml_str(text)?))
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    pub fn new_select(&self) -> Select {
        Select::new(&self.config)
    }

    pub fn new_insert(&self) -> Insert {
        Insert::new(&self.config)
    }

    pub fn new_update(&self) -> Update {
        Update::new(&self.config)
    }

    pub fn new_delete(&self) -> Delete {
        Delete::new(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SqlQuery;

    #[test]
    fn test_builders_share_dialect() {
        let factory = QueryFactory::new(Dialect::Sqlsrv);
        assert_eq!(factory.new_select().dialect(), Dialect::Sqlsrv);
        assert_eq!(factory.new_insert().dialect(), Dialect::Sqlsrv);
        assert_eq!(factory.new_update().dialect(), Dialect::Sqlsrv);
        assert_eq!(factory.new_delete().dialect(), Dialect::Sqlsrv);
    }

    #[test]
    fn test_page_size_from_config() {
        let factory = QueryFactory::from_toml_str("default_page_size = 25").unwrap();
        let mut select = factory.new_select();
        assert_eq!(select.paging(), 25);
        select.page(3);
        assert_eq!(select.to_sql().unwrap(), "SELECT\nLIMIT 25 OFFSET 50");
    }
}
