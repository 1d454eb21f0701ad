//! Column/value pairs for INSERT and UPDATE.

use std::collections::HashSet;
use std::fmt;

/// What a column is set to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue {
    /// `:name`, bound later by the caller or by `value()`.
    Placeholder(String),
    /// Raw SQL emitted verbatim (`NOW()`, `c2 + 1`).
    Raw(String),
    /// `NULL`.
    Null,
}

impl ColumnValue {
    /// Placeholder named after the column.
    pub fn placeholder(column: &str) -> Self {
        ColumnValue::Placeholder(column.to_string())
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Placeholder(name) => write!(f, ":{name}"),
            ColumnValue::Raw(sql) => f.write_str(sql),
            ColumnValue::Null => f.write_str("NULL"),
        }
    }
}

/// Ordered column assignments. Setting a column again replaces its value in
/// place.
///
/// Columns whose placeholder was bound together with its value are tracked,
/// so reassigning one reports the bind that no longer has a reference.
#[derive(Debug, Clone, Default)]
pub struct ColumnValues {
    items: Vec<(String, ColumnValue)>,
    bound: HashSet<String>,
}

impl ColumnValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Set a column.
    ///
    /// Returns the bind name released when a column set through
    /// [`set_bound`](Self::set_bound) gets anything other than its own
    /// placeholder.
    pub fn set(&mut self, column: &str, value: ColumnValue) -> Option<String> {
        let column = column.trim();
        let keeps_placeholder = matches!(&value, ColumnValue::Placeholder(name) if name == column);
        match self.items.iter_mut().find(|(c, _)| c == column) {
            Some((_, slot)) => *slot = value,
            None => self.items.push((column.to_string(), value)),
        }
        (!keeps_placeholder && self.bound.remove(column)).then(|| column.to_string())
    }

    /// Set a column to its placeholder and mark the placeholder as bound.
    pub fn set_bound(&mut self, column: &str) {
        let column = column.trim();
        self.set(column, ColumnValue::placeholder(column));
        self.bound.insert(column.to_string());
    }

    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.items.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnValue)> {
        self.items.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.bound.clear();
    }
}
