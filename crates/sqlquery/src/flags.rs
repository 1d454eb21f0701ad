//! Statement keyword flags (`DISTINCT`, `HIGH_PRIORITY`, `OR IGNORE`, ...).
//!
//! Each dialect declares, per statement kind, which flags are legal, the order
//! they render in, and which of them are mutually exclusive. Rendering always
//! follows the declared order, never call order.

use crate::error::{QueryError, QueryResult};
use std::fmt;

/// A keyword modifier inserted right after the statement keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flag {
    Distinct,
    HighPriority,
    LowPriority,
    Delayed,
    Ignore,
    Quick,
    StraightJoin,
    SqlSmallResult,
    SqlBigResult,
    SqlBufferResult,
    SqlCache,
    SqlNoCache,
    SqlCalcFoundRows,
    OrAbort,
    OrFail,
    OrIgnore,
    OrReplace,
    OrRollback,
}

impl Flag {
    /// The SQL keyword(s) for this flag.
    pub fn keyword(self) -> &'static str {
        match self {
            Flag::Distinct => "DISTINCT",
            Flag::HighPriority => "HIGH_PRIORITY",
            Flag::LowPriority => "LOW_PRIORITY",
            Flag::Delayed => "DELAYED",
            Flag::Ignore => "IGNORE",
            Flag::Quick => "QUICK",
            Flag::StraightJoin => "STRAIGHT_JOIN",
            Flag::SqlSmallResult => "SQL_SMALL_RESULT",
            Flag::SqlBigResult => "SQL_BIG_RESULT",
            Flag::SqlBufferResult => "SQL_BUFFER_RESULT",
            Flag::SqlCache => "SQL_CACHE",
            Flag::SqlNoCache => "SQL_NO_CACHE",
            Flag::SqlCalcFoundRows => "SQL_CALC_FOUND_ROWS",
            Flag::OrAbort => "OR ABORT",
            Flag::OrFail => "OR FAIL",
            Flag::OrIgnore => "OR IGNORE",
            Flag::OrReplace => "OR REPLACE",
            Flag::OrRollback => "OR ROLLBACK",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Legal flags for one statement kind in one dialect.
#[derive(Debug, Clone, Copy)]
pub struct FlagVocabulary {
    /// Legal flags, in render order.
    pub declared: &'static [Flag],
    /// Groups of flags where enabling one clears the others.
    pub exclusive: &'static [&'static [Flag]],
}

impl FlagVocabulary {
    /// A vocabulary with no legal flags.
    pub const EMPTY: FlagVocabulary = FlagVocabulary {
        declared: &[],
        exclusive: &[],
    };

    /// Check whether `flag` is legal.
    pub fn allows(&self, flag: Flag) -> bool {
        self.declared.contains(&flag)
    }

    fn group_of(&self, flag: Flag) -> Option<&'static [Flag]> {
        self.exclusive.iter().copied().find(|group| group.contains(&flag))
    }
}

/// The enabled flags of a statement.
#[derive(Debug, Clone)]
pub struct FlagSet {
    vocabulary: &'static FlagVocabulary,
    enabled: Vec<Flag>,
    dialect: &'static str,
    statement: &'static str,
}

impl FlagSet {
    /// Create an empty flag set over a vocabulary.
    pub fn new(vocabulary: &'static FlagVocabulary, dialect: &'static str, statement: &'static str) -> Self {
        Self {
            vocabulary,
            enabled: Vec::new(),
            dialect,
            statement,
        }
    }

    /// Enable or disable a flag.
    ///
    /// Enabling a member of an exclusive group disables the rest of the group.
    pub fn set(&mut self, flag: Flag, enabled: bool) -> QueryResult<()> {
        if !self.vocabulary.allows(flag) {
            return Err(QueryError::UnsupportedFlag {
                flag: flag.keyword(),
                dialect: self.dialect,
                statement: self.statement,
            });
        }

        if enabled {
            if let Some(group) = self.vocabulary.group_of(flag) {
                self.enabled.retain(|f| !group.contains(f));
            }
            if !self.enabled.contains(&flag) {
                self.enabled.push(flag);
            }
        } else {
            self.enabled.retain(|f| *f != flag);
        }
        Ok(())
    }

    /// Check whether a flag is enabled.
    pub fn is_set(&self, flag: Flag) -> bool {
        self.enabled.contains(&flag)
    }

    /// Check whether no flag is enabled.
    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    /// Disable every flag.
    pub fn clear(&mut self) {
        self.enabled.clear();
    }

    /// Render enabled flags in declared order, space separated.
    pub fn render(&self) -> String {
        self.vocabulary
            .declared
            .iter()
            .filter(|f| self.enabled.contains(f))
            .map(|f| f.keyword())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
