//! FROM entries and the joins attached to them.
//!
//! Each FROM call opens a new entry and makes it current; each JOIN call
//! attaches to the current entry. Rendering emits every entry followed by its
//! own joins, so joins stay next to the table they were declared after.

use crate::error::{QueryError, QueryResult};
use crate::fragment::Fragment;
use crate::query::Select;
use std::fmt;
use std::str::FromStr;

/// JOIN type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    LeftOuter,
    Right,
    RightOuter,
    Full,
    Cross,
    Natural,
}

impl JoinKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::LeftOuter => "LEFT OUTER JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::RightOuter => "RIGHT OUTER JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
            JoinKind::Natural => "NATURAL JOIN",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for JoinKind {
    type Err = QueryError;

    fn from_str(s: &str) -> QueryResult<Self> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_uppercase();
        let normalized = normalized.strip_suffix(" JOIN").unwrap_or(&normalized);
        match normalized {
            "INNER" | "JOIN" | "" => Ok(JoinKind::Inner),
            "LEFT" => Ok(JoinKind::Left),
            "LEFT OUTER" => Ok(JoinKind::LeftOuter),
            "RIGHT" => Ok(JoinKind::Right),
            "RIGHT OUTER" => Ok(JoinKind::RightOuter),
            "FULL" | "FULL OUTER" => Ok(JoinKind::Full),
            "CROSS" => Ok(JoinKind::Cross),
            "NATURAL" => Ok(JoinKind::Natural),
            _ => Err(QueryError::UnknownJoin(s.trim().to_string())),
        }
    }
}

/// Source of a sub-select: literal SQL or another SELECT builder.
#[derive(Debug, Clone)]
pub enum SubSelect {
    Raw(String),
    Query(Box<Select>),
}

impl From<&str> for SubSelect {
    fn from(sql: &str) -> Self {
        SubSelect::Raw(sql.to_string())
    }
}

impl From<String> for SubSelect {
    fn from(sql: String) -> Self {
        SubSelect::Raw(sql)
    }
}

impl From<Select> for SubSelect {
    fn from(query: Select) -> Self {
        SubSelect::Query(Box::new(query))
    }
}

impl From<&Select> for SubSelect {
    fn from(query: &Select) -> Self {
        SubSelect::Query(Box::new(query.clone()))
    }
}

/// Normalize a join condition: empty means none, `ON ...`/`USING ...` are kept,
/// anything else gets an `ON ` prefix.
pub(crate) fn join_condition(on: &str) -> Option<String> {
    let on = on.trim();
    if on.is_empty() {
        return None;
    }
    let upper = on.to_ascii_uppercase();
    if upper.starts_with("ON ") || upper.starts_with("USING ") || upper.starts_with("USING(") {
        Some(on.to_string())
    } else {
        Some(format!("ON {on}"))
    }
}

/// `(\n    <sub>\n) AS <alias>`
pub(crate) fn sub_select_fragment(body: &Fragment, quoted_alias: &str) -> Fragment {
    let mut out = Fragment::text("(\n");
    out.append(&body.indented("    "));
    out.push_str("\n) AS ").push_str(quoted_alias);
    out
}

/// `<KIND> JOIN <target>[ <condition>]`
pub(crate) fn join_fragment(kind: JoinKind, target: &Fragment, condition: Option<&Fragment>) -> Fragment {
    let mut out = Fragment::text(kind.keyword());
    out.push_str(" ").append(target);
    if let Some(condition) = condition {
        out.push_str(" ").append(condition);
    }
    out
}

#[derive(Debug, Clone)]
struct FromEntry {
    spec: Fragment,
    joins: Vec<Fragment>,
}

/// FROM entries with their joins.
#[derive(Debug, Clone, Default)]
pub struct FromList {
    /// Joins declared before any FROM entry.
    leading: Vec<Fragment>,
    entries: Vec<FromEntry>,
}

impl FromList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.leading.is_empty()
    }

    /// Number of FROM entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Append a FROM entry and make it current.
    pub fn add_from(&mut self, spec: Fragment) {
        self.entries.push(FromEntry {
            spec,
            joins: Vec::new(),
        });
    }

    /// Attach a join to the current FROM entry.
    pub fn add_join(&mut self, join: Fragment) {
        match self.entries.last_mut() {
            Some(entry) => entry.joins.push(join),
            None => self.leading.push(join),
        }
    }

    pub fn clear(&mut self) {
        self.leading.clear();
        self.entries.clear();
    }

    /// Render the FROM section with joins attached to their entries.
    ///
    /// Without any FROM entry, leading joins render on their own.
    pub fn render(&self, out: &mut Fragment) {
        if self.entries.is_empty() {
            for join in &self.leading {
                out.push_str("\n").append(join);
            }
            return;
        }

        out.push_str("\nFROM\n    ");
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push_str(",\n    ");
            }
            out.append(&entry.spec.indent_continuation("    "));
            let leading = if i == 0 { self.leading.as_slice() } else { &[] };
            for join in leading.iter().chain(entry.joins.iter()) {
                out.push_str("\n").append(join);
            }
        }
    }
}
