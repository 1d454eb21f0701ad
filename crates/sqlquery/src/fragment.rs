//! SQL text with structured bind placeholders.
//!
//! A [`Fragment`] stores raw SQL pieces and sequential bind keys separately.
//! Placeholder text (`:_1_`) is only produced by [`Fragment::to_sql`], so
//! fragments can be re-keyed and indented without any string replacement.

use crate::bind::BindKey;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(String),
    Bind(usize),
}

/// Rendered SQL with auto-bound placeholders kept as keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pieces: Vec<Piece>,
}

impl Fragment {
    /// Create an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fragment holding plain text.
    pub fn text(sql: impl Into<String>) -> Self {
        let mut fragment = Self::new();
        fragment.push_str(&sql.into());
        fragment
    }

    /// Check if the fragment renders to nothing.
    pub fn is_empty(&self) -> bool {
        self.pieces.iter().all(|p| matches!(p, Piece::Text(t) if t.is_empty()))
    }

    /// Append raw SQL.
    pub fn push_str(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }
        match self.pieces.last_mut() {
            Some(Piece::Text(last)) => last.push_str(sql),
            _ => self.pieces.push(Piece::Text(sql.to_string())),
        }
        self
    }

    /// Append a placeholder for sequential bind key `n`.
    pub fn push_bind(&mut self, n: usize) -> &mut Self {
        self.pieces.push(Piece::Bind(n));
        self
    }

    /// Append another fragment.
    pub fn append(&mut self, other: &Fragment) -> &mut Self {
        for piece in &other.pieces {
            match piece {
                Piece::Text(t) => {
                    self.push_str(t);
                }
                Piece::Bind(n) => {
                    self.push_bind(*n);
                }
            }
        }
        self
    }

    /// Append fragments separated by `sep`.
    pub fn append_joined<'a>(&mut self, parts: impl IntoIterator<Item = &'a Fragment>, sep: &str) -> &mut Self {
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                self.push_str(sep);
            }
            self.append(part);
        }
        self
    }

    /// Prefix every line with `indent`.
    pub fn indented(&self, indent: &str) -> Fragment {
        let mut out = Fragment::text(indent);
        out.append(&self.indent_continuation(indent));
        out
    }

    /// Prefix every line after the first with `indent`.
    pub fn indent_continuation(&self, indent: &str) -> Fragment {
        let mut out = Fragment::new();
        let newline = format!("\n{indent}");
        for piece in &self.pieces {
            match piece {
                Piece::Text(t) => {
                    out.push_str(&t.replace('\n', &newline));
                }
                Piece::Bind(n) => {
                    out.push_bind(*n);
                }
            }
        }
        out
    }

    /// Map every sequential bind key through `f`.
    pub fn rekey(&self, f: impl Fn(usize) -> usize) -> Fragment {
        Fragment {
            pieces: self
                .pieces
                .iter()
                .map(|p| match p {
                    Piece::Text(t) => Piece::Text(t.clone()),
                    Piece::Bind(n) => Piece::Bind(f(*n)),
                })
                .collect(),
        }
    }

    /// Sequential bind keys referenced, in text order.
    pub fn bind_keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.pieces.iter().filter_map(|p| match p {
            Piece::Bind(n) => Some(*n),
            Piece::Text(_) => None,
        })
    }

    /// Render the SQL text.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Text(t) => out.push_str(t),
                Piece::Bind(n) => out.push_str(&BindKey::Seq(*n).placeholder()),
            }
        }
        out
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
