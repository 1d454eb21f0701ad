//! Dialect profiles.
//!
//! A [`Dialect`] resolves to a static [`DialectProfile`]: quote characters,
//! pagination style, mutation paging, RETURNING support, the empty-INSERT form
//! and one flag vocabulary per statement kind. Every builder reads its dialect
//! through this profile; there is no per-dialect builder type.

use crate::error::{QueryError, QueryResult};
use crate::flags::{Flag, FlagVocabulary};
use crate::paging::{MutationPaging, PaginationStyle};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Statement kind, used to pick a flag vocabulary and in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn keyword(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Target SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// ANSI-flavoured SQL with `"` quoting and `LIMIT`/`OFFSET`.
    #[default]
    #[serde(alias = "ansi")]
    Common,
    #[serde(alias = "mariadb")]
    Mysql,
    #[serde(alias = "postgres", alias = "postgresql")]
    Pgsql,
    Sqlite,
    #[serde(alias = "mssql", alias = "sqlserver")]
    Sqlsrv,
}

impl Dialect {
    /// The static profile for this dialect.
    pub fn profile(self) -> &'static DialectProfile {
        match self {
            Dialect::Common => &COMMON,
            Dialect::Mysql => &MYSQL,
            Dialect::Pgsql => &PGSQL,
            Dialect::Sqlite => &SQLITE,
            Dialect::Sqlsrv => &SQLSRV,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile().name)
    }
}

impl FromStr for Dialect {
    type Err = QueryError;

    fn from_str(s: &str) -> QueryResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "common" | "ansi" => Ok(Dialect::Common),
            "mysql" | "mariadb" => Ok(Dialect::Mysql),
            "pgsql" | "postgres" | "postgresql" => Ok(Dialect::Pgsql),
            "sqlite" => Ok(Dialect::Sqlite),
            "sqlsrv" | "mssql" | "sqlserver" => Ok(Dialect::Sqlsrv),
            other => Err(QueryError::Config(format!("unknown dialect '{other}'"))),
        }
    }
}

/// Everything a builder needs to know about its dialect.
#[derive(Debug)]
pub struct DialectProfile {
    pub name: &'static str,
    pub quote_prefix: &'static str,
    pub quote_suffix: &'static str,
    pub pagination: PaginationStyle,
    pub mutation_paging: MutationPaging,
    pub returning: bool,
    /// Body rendered after `INSERT INTO <table>` when no column is set.
    pub empty_insert: &'static str,
    pub select_flags: FlagVocabulary,
    pub insert_flags: FlagVocabulary,
    pub update_flags: FlagVocabulary,
    pub delete_flags: FlagVocabulary,
}

impl DialectProfile {
    /// The flag vocabulary for a statement kind.
    pub fn flags(&'static self, kind: StatementKind) -> &'static FlagVocabulary {
        match kind {
            StatementKind::Select => &self.select_flags,
            StatementKind::Insert => &self.insert_flags,
            StatementKind::Update => &self.update_flags,
            StatementKind::Delete => &self.delete_flags,
        }
    }

    /// Fail unless RETURNING is available.
    pub fn require_returning(&self) -> QueryResult<()> {
        if self.returning {
            Ok(())
        } else {
            Err(QueryError::unsupported(self.name, "RETURNING"))
        }
    }
}

const SELECT_DISTINCT: FlagVocabulary = FlagVocabulary {
    declared: &[Flag::Distinct],
    exclusive: &[],
};

const SQLITE_OR: &[Flag] = &[
    Flag::OrAbort,
    Flag::OrFail,
    Flag::OrIgnore,
    Flag::OrReplace,
    Flag::OrRollback,
];

static COMMON: DialectProfile = DialectProfile {
    name: "Common",
    quote_prefix: "\"",
    quote_suffix: "\"",
    pagination: PaginationStyle::LimitOffset,
    mutation_paging: MutationPaging::None,
    returning: false,
    empty_insert: "DEFAULT VALUES",
    select_flags: SELECT_DISTINCT,
    insert_flags: FlagVocabulary::EMPTY,
    update_flags: FlagVocabulary::EMPTY,
    delete_flags: FlagVocabulary::EMPTY,
};

static MYSQL: DialectProfile = DialectProfile {
    name: "MySQL",
    quote_prefix: "`",
    quote_suffix: "`",
    pagination: PaginationStyle::LimitOffset,
    mutation_paging: MutationPaging::Limit,
    returning: false,
    empty_insert: "() VALUES ()",
    select_flags: FlagVocabulary {
        declared: &[
            Flag::Distinct,
            Flag::HighPriority,
            Flag::StraightJoin,
            Flag::SqlSmallResult,
            Flag::SqlBigResult,
            Flag::SqlBufferResult,
            Flag::SqlCache,
            Flag::SqlNoCache,
            Flag::SqlCalcFoundRows,
        ],
        exclusive: &[
            &[Flag::SqlSmallResult, Flag::SqlBigResult],
            &[Flag::SqlCache, Flag::SqlNoCache],
        ],
    },
    insert_flags: FlagVocabulary {
        declared: &[Flag::HighPriority, Flag::LowPriority, Flag::Delayed, Flag::Ignore],
        exclusive: &[&[Flag::HighPriority, Flag::LowPriority, Flag::Delayed]],
    },
    update_flags: FlagVocabulary {
        declared: &[Flag::LowPriority, Flag::Ignore],
        exclusive: &[],
    },
    delete_flags: FlagVocabulary {
        declared: &[Flag::LowPriority, Flag::Quick, Flag::Ignore],
        exclusive: &[],
    },
};

static PGSQL: DialectProfile = DialectProfile {
    name: "PostgreSQL",
    quote_prefix: "\"",
    quote_suffix: "\"",
    pagination: PaginationStyle::LimitOffset,
    mutation_paging: MutationPaging::None,
    returning: true,
    empty_insert: "DEFAULT VALUES",
    select_flags: SELECT_DISTINCT,
    insert_flags: FlagVocabulary::EMPTY,
    update_flags: FlagVocabulary::EMPTY,
    delete_flags: FlagVocabulary::EMPTY,
};

static SQLITE: DialectProfile = DialectProfile {
    name: "SQLite",
    quote_prefix: "\"",
    quote_suffix: "\"",
    pagination: PaginationStyle::LimitOffset,
    mutation_paging: MutationPaging::LimitOffset,
    returning: false,
    empty_insert: "DEFAULT VALUES",
    select_flags: SELECT_DISTINCT,
    insert_flags: FlagVocabulary {
        declared: SQLITE_OR,
        exclusive: &[SQLITE_OR],
    },
    update_flags: FlagVocabulary {
        declared: SQLITE_OR,
        exclusive: &[SQLITE_OR],
    },
    delete_flags: FlagVocabulary::EMPTY,
};

static SQLSRV: DialectProfile = DialectProfile {
    name: "SQL Server",
    quote_prefix: "[",
    quote_suffix: "]",
    pagination: PaginationStyle::TopOffsetFetch,
    mutation_paging: MutationPaging::None,
    returning: false,
    empty_insert: "DEFAULT VALUES",
    select_flags: SELECT_DISTINCT,
    insert_flags: FlagVocabulary::EMPTY,
    update_flags: FlagVocabulary::EMPTY,
    delete_flags: FlagVocabulary::EMPTY,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("postgres".parse::<Dialect>().unwrap(), Dialect::Pgsql);
        assert_eq!("MSSQL".parse::<Dialect>().unwrap(), Dialect::Sqlsrv);
        assert_eq!(" mysql ".parse::<Dialect>().unwrap(), Dialect::Mysql);
        assert!("oracle".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_profiles() {
        assert_eq!(Dialect::Sqlsrv.profile().quote_prefix, "[");
        assert_eq!(Dialect::Mysql.profile().quote_suffix, "`");
        assert_eq!(Dialect::Sqlsrv.profile().pagination, PaginationStyle::TopOffsetFetch);
        assert!(Dialect::Pgsql.profile().returning);
        assert!(!Dialect::Common.profile().mutation_paging.allows_limit());
        assert!(Dialect::Sqlite.profile().mutation_paging.allows_offset());
    }

    #[test]
    fn test_every_select_allows_distinct() {
        for dialect in [
            Dialect::Common,
            Dialect::Mysql,
            Dialect::Pgsql,
            Dialect::Sqlite,
            Dialect::Sqlsrv,
        ] {
            assert!(dialect.profile().flags(StatementKind::Select).allows(Flag::Distinct));
        }
    }

    #[test]
    fn test_require_returning() {
        assert!(Dialect::Pgsql.profile().require_returning().is_ok());
        let err = Dialect::Mysql.profile().require_returning().unwrap_err();
        assert_eq!(err.to_string(), "MySQL does not support RETURNING");
    }
}
