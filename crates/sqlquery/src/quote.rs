//! Identifier quoting.
//!
//! Two entry points:
//!
//! - [`Quoter::quote_name`] quotes one table/column/alias name, honouring
//!   `AS` aliases and dotted qualification (`t1.c1` -> `"t1"."c1"`).
//! - [`Quoter::quote_names_in`] quotes only the dotted identifiers found
//!   inside a larger expression (`COUNT(t1.c3)` -> `COUNT("t1"."c3")`).
//!
//! Neither quotes `*`, and neither double-quotes text that is already quoted.

use crate::dialect::DialectProfile;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Dialect-aware identifier quoter.
#[derive(Debug, Clone, Copy)]
pub struct Quoter {
    prefix: &'static str,
    suffix: &'static str,
}

impl Quoter {
    /// Create a quoter from explicit quote characters.
    pub const fn new(prefix: &'static str, suffix: &'static str) -> Self {
        Self { prefix, suffix }
    }

    /// Create a quoter for a dialect profile.
    pub fn for_profile(profile: &DialectProfile) -> Self {
        Self::new(profile.quote_prefix, profile.quote_suffix)
    }

    /// One quoted identifier: opens and closes with the quote characters and
    /// holds no closing quote in between, other than doubled escapes.
    fn is_quoted(&self, name: &str) -> bool {
        if name.len() < self.prefix.len() + self.suffix.len()
            || !name.starts_with(self.prefix)
            || !name.ends_with(self.suffix)
        {
            return false;
        }
        let inner = &name[self.prefix.len()..name.len() - self.suffix.len()];
        !inner.replace(&self.suffix.repeat(2), "").contains(self.suffix)
    }

    /// Split on dots that sit outside quoted parts.
    fn split_parts<'a>(&self, spec: &'a str) -> Vec<&'a str> {
        let mut parts = Vec::new();
        let mut start = 0;
        let mut in_quote = false;
        for (i, c) in spec.char_indices() {
            if in_quote {
                in_quote = !spec[i..].starts_with(self.suffix);
            } else if spec[i..].starts_with(self.prefix) {
                in_quote = true;
            } else if c == '.' {
                parts.push(&spec[start..i]);
                start = i + 1;
            }
        }
        parts.push(&spec[start..]);
        parts
    }

    /// Quote a single name.
    ///
    /// - `*` and expressions containing `(` pass through unchanged.
    /// - `name AS alias` and `name alias` quote both sides.
    /// - `a.b.c` quotes each part; a trailing `*` part is left bare.
    pub fn quote_name(&self, spec: &str) -> String {
        let spec = spec.trim();

        if spec == "*" || spec.contains('(') || self.is_quoted(spec) {
            return spec.to_string();
        }

        if let Some((name, alias)) = split_alias(spec) {
            return format!("{} AS {}", self.quote_name(name), self.quote_name(alias));
        }

        if let Some((name, alias)) = spec.split_once(' ') {
            let alias = alias.trim();
            if !alias.is_empty() && !alias.contains(' ') {
                return format!("{} {}", self.quote_name(name), self.quote_name(alias));
            }
        }

        self.split_parts(spec)
            .into_iter()
            .map(|part| self.quote_part(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn quote_part(&self, part: &str) -> String {
        if part == "*" || self.is_quoted(part) {
            part.to_string()
        } else {
            format!("{}{}{}", self.prefix, part, self.suffix)
        }
    }

    /// Quote every dotted identifier (`table.col`) inside an expression.
    ///
    /// Single-quoted string literals and already-quoted identifiers are left
    /// untouched, as are bare names without a dot.
    pub fn quote_names_in(&self, text: &str) -> String {
        dotted_regex()
            .replace_all(text, |caps: &Captures<'_>| {
                let matched = &caps[0];
                if caps.name("ident").is_some() {
                    self.quote_name(matched)
                } else {
                    matched.to_string()
                }
            })
            .into_owned()
    }
}

/// Split `name AS alias` on a case-insensitive ` AS `.
fn split_alias(spec: &str) -> Option<(&str, &str)> {
    let upper = spec.to_ascii_uppercase();
    let pos = upper.find(" AS ")?;
    let name = spec[..pos].trim();
    let alias = spec[pos + 4..].trim();
    (!name.is_empty() && !alias.is_empty()).then_some((name, alias))
}

fn dotted_regex() -> &'static Regex {
    static DOTTED_RE: OnceLock<Regex> = OnceLock::new();
    DOTTED_RE.get_or_init(|| {
        // Literals and quoted identifiers are matched first so they are skipped whole.
        Regex::new(
            r#"'(?:[^']|'')*'|"[^"]*"|`[^`]*`|\[[^\]]*\]|:{1,2}[A-Za-z_][A-Za-z0-9_]*|(?P<ident>\b[A-Za-z_][A-Za-z0-9_$]*(?:\.(?:[A-Za-z_][A-Za-z0-9_$]*|\*))+)"#,
        )
        .expect("invalid built-in identifier regex")
    })
}
