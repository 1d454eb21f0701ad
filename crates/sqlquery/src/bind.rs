//! Bind values and the per-query bind register.
//!
//! Every query owns exactly one [`BindRegister`]. Sequential keys are issued in
//! the order fragments are appended, across all clauses, and are never
//! re-issued when the query is rendered again.

use crate::error::{QueryError, QueryResult};
use crate::fragment::Fragment;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A bind value.
pub use serde_json::Value;

/// Key of a bound value: a sequential number or an explicit name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindKey {
    /// Auto-bound value, rendered as `:_n_`.
    Seq(usize),
    /// Named value, referenced as `:name`.
    Named(String),
}

impl BindKey {
    /// The key without the leading colon (`_1_`, `c1`).
    pub fn name(&self) -> String {
        match self {
            BindKey::Seq(n) => format!("_{n}_"),
            BindKey::Named(name) => name.clone(),
        }
    }

    /// The placeholder text (`:_1_`, `:c1`).
    pub fn placeholder(&self) -> String {
        format!(":{}", self.name())
    }
}

impl fmt::Display for BindKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl Serialize for BindKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

/// What happens when a named key is bound twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindCollision {
    /// Last write wins; the key keeps its original position.
    #[default]
    Overwrite,
    /// Return `QueryError::DuplicateBind`.
    Reject,
}

/// Ordered mapping from bind key to value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindValues {
    entries: Vec<(BindKey, Value)>,
}

impl BindValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a value by key.
    pub fn get(&self, key: &BindKey) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Look up an auto-bound value by its sequence number.
    pub fn get_seq(&self, n: usize) -> Option<&Value> {
        self.get(&BindKey::Seq(n))
    }

    /// Look up a named value.
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| matches!(k, BindKey::Named(n) if n == name))
            .map(|(_, v)| v)
    }

    pub fn contains(&self, key: &BindKey) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BindKey, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &BindKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Remove a key, keeping the order of the rest.
    fn remove(&mut self, key: &BindKey) -> Option<Value> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Insert or overwrite in place.
    fn upsert(&mut self, key: BindKey, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }
}

impl IntoIterator for BindValues {
    type Item = (BindKey, Value);
    type IntoIter = std::vec::IntoIter<(BindKey, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for BindValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Values accepted alongside a raw SQL fragment.
///
/// `()` means no values; a scalar is one value; a `Vec` or array is one value
/// per placeholder. When the fragment has a single `?` and nothing else, a
/// longer list binds to it as one array value (`x IN (?)`).
pub trait IntoBinds {
    fn into_binds(self) -> Vec<Value>;
}

impl IntoBinds for () {
    fn into_binds(self) -> Vec<Value> {
        Vec::new()
    }
}

impl IntoBinds for Value {
    fn into_binds(self) -> Vec<Value> {
        vec![self]
    }
}

impl<T: Into<Value>> IntoBinds for Vec<T> {
    fn into_binds(self) -> Vec<Value> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Value>, const N: usize> IntoBinds for [T; N] {
    fn into_binds(self) -> Vec<Value> {
        self.into_iter().map(Into::into).collect()
    }
}

macro_rules! scalar_binds {
    ($($t:ty),*) => {
        $(
            impl IntoBinds for $t {
                fn into_binds(self) -> Vec<Value> {
                    vec![Value::from(self)]
                }
            }
        )*
    };
}

scalar_binds!(&str, String, bool, i32, i64, u32, u64, f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker<'a> {
    Positional,
    Named(&'a str),
}

/// Find `?` and `:name` placeholders, skipping quoted spans and `::` casts.
///
/// Quoted spans are `'...'` and `"..."` literals, `` `...` `` identifiers and
/// `[...]` identifiers. A `[` right after a name or `)` is a subscript
/// (`ARRAY[?]`, `tags[1]`) and is scanned normally.
///
/// Returns `(start, end, marker)` byte ranges in text order.
fn scan_placeholders(text: &str) -> Vec<(usize, usize, Marker<'_>)> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => i = skip_quoted(bytes, i, quote),
            b'[' if !follows_operand(bytes, i) => i = skip_quoted(bytes, i, b']'),
            b'?' => {
                found.push((i, i + 1, Marker::Positional));
                i += 1;
            }
            b':' if bytes.get(i + 1) == Some(&b':') => {
                i += 2;
            }
            b':' if bytes.get(i + 1).is_some_and(|c| c.is_ascii_alphabetic() || *c == b'_') => {
                let start = i;
                i += 1;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                found.push((start, i, Marker::Named(&text[start + 1..i])));
            }
            _ => i += 1,
        }
    }
    found
}

/// Index just past the span opened at `start`. Doubled quotes (`'it''s'`)
/// close and reopen the span, which lands on the same end. Unterminated
/// spans run to the end of the text.
fn skip_quoted(bytes: &[u8], start: usize, close: u8) -> usize {
    bytes[start + 1..]
        .iter()
        .position(|&c| c == close)
        .map_or(bytes.len(), |pos| start + pos + 2)
}

fn follows_operand(bytes: &[u8], i: usize) -> bool {
    i > 0 && {
        let prev = bytes[i - 1];
        prev.is_ascii_alphanumeric() || matches!(prev, b'_' | b']' | b')')
    }
}

/// Accumulates the bind values of one query.
#[derive(Debug, Clone, Default)]
pub struct BindRegister {
    values: BindValues,
    last_seq: usize,
    collision: BindCollision,
}

impl BindRegister {
    /// Create an empty register with a named-key collision policy.
    pub fn new(collision: BindCollision) -> Self {
        Self {
            values: BindValues::new(),
            last_seq: 0,
            collision,
        }
    }

    /// Bind a value under the next sequential key.
    pub fn bind(&mut self, value: impl Into<Value>) -> BindKey {
        self.last_seq += 1;
        let key = BindKey::Seq(self.last_seq);
        self.values.entries.push((key.clone(), value.into()));
        key
    }

    /// Bind a value under an explicit name.
    pub fn bind_named(&mut self, name: &str, value: impl Into<Value>) -> QueryResult<BindKey> {
        let key = BindKey::Named(name.to_string());
        if self.collision == BindCollision::Reject && self.values.contains(&key) {
            return Err(QueryError::DuplicateBind(name.to_string()));
        }
        self.values.upsert(key.clone(), value.into());
        Ok(key)
    }

    /// Drop a named value. Other keys keep their order.
    pub fn unbind_named(&mut self, name: &str) -> Option<Value> {
        self.values.remove(&BindKey::Named(name.to_string()))
    }

    /// Bind the values that accompany a raw SQL fragment.
    ///
    /// Each `?` consumes the next value and becomes a sequential placeholder.
    /// `:name` placeholders stay as written; they consume values only when the
    /// number of values covers them as well as every `?`.
    pub fn bind_inline(&mut self, text: &str, values: Vec<Value>) -> QueryResult<Fragment> {
        let markers = scan_placeholders(text);
        let positional = markers
            .iter()
            .filter(|(_, _, m)| *m == Marker::Positional)
            .count();
        let named = markers.len() - positional;

        let values = if positional == 1 && named == 0 && values.len() > 1 {
            vec![Value::Array(values)]
        } else {
            values
        };

        let consume_named = if values.len() == positional {
            false
        } else if values.len() == positional + named {
            true
        } else {
            let expected = if values.len() < positional {
                positional
            } else {
                positional + named
            };
            return Err(QueryError::mismatch(text, expected, values.len()));
        };

        if consume_named && named > 0 && self.collision == BindCollision::Reject {
            let mut seen = HashSet::new();
            for (_, _, marker) in &markers {
                if let Marker::Named(name) = marker {
                    if !seen.insert(*name) || self.values.get_named(name).is_some() {
                        return Err(QueryError::DuplicateBind(name.to_string()));
                    }
                }
            }
        }

        let mut fragment = Fragment::new();
        let mut values = values.into_iter();
        let mut cursor = 0;
        for (start, end, marker) in markers {
            fragment.push_str(&text[cursor..start]);
            match marker {
                Marker::Positional => {
                    let value = values.next().unwrap_or(Value::Null);
                    self.last_seq += 1;
                    self.values
                        .entries
                        .push((BindKey::Seq(self.last_seq), value));
                    fragment.push_bind(self.last_seq);
                }
                Marker::Named(name) => {
                    fragment.push_str(&text[start..end]);
                    if consume_named {
                        let value = values.next().unwrap_or(Value::Null);
                        self.bind_named(name, value)?;
                    }
                }
            }
            cursor = end;
        }
        fragment.push_str(&text[cursor..]);
        Ok(fragment)
    }

    /// Merge an already rendered sub-query into this register.
    ///
    /// Sequential values are re-bound after this register's own keys, in the
    /// sub-query's order, and the fragment is re-keyed to match. Named values
    /// are merged by name.
    pub fn absorb(&mut self, fragment: &Fragment, binds: &BindValues) -> QueryResult<Fragment> {
        if self.collision == BindCollision::Reject {
            for key in binds.keys() {
                if let BindKey::Named(name) = key {
                    if self.values.contains(key) {
                        return Err(QueryError::DuplicateBind(name.clone()));
                    }
                }
            }
        }

        let mut rekeyed = HashMap::new();
        for (key, value) in binds.iter() {
            match key {
                BindKey::Seq(n) => {
                    if let BindKey::Seq(new) = self.bind(value.clone()) {
                        rekeyed.insert(*n, new);
                    }
                }
                BindKey::Named(name) => {
                    self.bind_named(name, value.clone())?;
                }
            }
        }
        Ok(fragment.rekey(|n| rekeyed.get(&n).copied().unwrap_or(n)))
    }

    /// All values bound so far.
    pub fn values(&self) -> &BindValues {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sequential_keys() {
        let mut reg = BindRegister::default();
        assert_eq!(reg.bind("a"), BindKey::Seq(1));
        assert_eq!(reg.bind(2), BindKey::Seq(2));
        assert_eq!(reg.values().get_seq(2), Some(&json!(2)));
    }

    #[test]
    fn test_bind_inline_positional() {
        let mut reg = BindRegister::default();
        let f = reg.bind_inline("a = ? OR b = ?", vec![json!(1), json!("x")]).unwrap();
        assert_eq!(f.to_sql(), "a = :_1_ OR b = :_2_");
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_bind_inline_list_is_one_value() {
        let mut reg = BindRegister::default();
        let f = reg
            .bind_inline("baz IN (?)", [json!(["dib", "zim", "gir"])].into_binds())
            .unwrap();
        assert_eq!(f.to_sql(), "baz IN (:_1_)");
        assert_eq!(reg.values().get_seq(1), Some(&json!(["dib", "zim", "gir"])));
    }

    #[test]
    fn test_bind_inline_list_collapses_to_single_placeholder() {
        let mut reg = BindRegister::default();
        let f = reg.bind_inline("baz IN (?)", vec![json!("dib"), json!("zim"), json!("gir")]).unwrap();
        assert_eq!(f.to_sql(), "baz IN (:_1_)");
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.values().get_seq(1), Some(&json!(["dib", "zim", "gir"])));
    }

    #[test]
    fn test_bind_inline_named_left_for_caller() {
        let mut reg = BindRegister::default();
        let f = reg.bind_inline("a = :a AND b = ?", vec![json!(5)]).unwrap();
        assert_eq!(f.to_sql(), "a = :a AND b = :_1_");
        assert_eq!(reg.values().get_named("a"), None);
    }

    #[test]
    fn test_bind_inline_named_consumes_in_order() {
        let mut reg = BindRegister::default();
        let f = reg.bind_inline("a = :a AND b = ?", vec![json!(1), json!(2)]).unwrap();
        assert_eq!(f.to_sql(), "a = :a AND b = :_1_");
        assert_eq!(reg.values().get_named("a"), Some(&json!(1)));
        assert_eq!(reg.values().get_seq(1), Some(&json!(2)));
    }

    #[test]
    fn test_bind_inline_skips_literals_and_casts() {
        let mut reg = BindRegister::default();
        let f = reg
            .bind_inline("note = 'why?' AND id::text = ?", vec![json!("7")])
            .unwrap();
        assert_eq!(f.to_sql(), "note = 'why?' AND id::text = :_1_");
    }

    #[test]
    fn test_bind_inline_skips_quoted_names_and_strings() {
        let mut reg = BindRegister::default();
        let f = reg
            .bind_inline(r#"name = "O'Brien" AND id = ?"#, vec![json!(1)])
            .unwrap();
        assert_eq!(f.to_sql(), r#"name = "O'Brien" AND id = :_1_"#);

        let f = reg
            .bind_inline("[what?] = ? AND `a:b` = 'it''s?' AND c = ?", vec![json!(2), json!(3)])
            .unwrap();
        assert_eq!(f.to_sql(), "[what?] = :_2_ AND `a:b` = 'it''s?' AND c = :_3_");
    }

    #[test]
    fn test_bind_inline_subscript_is_not_quoted() {
        let mut reg = BindRegister::default();
        let f = reg
            .bind_inline("tags[?] = ANY(ARRAY[?, ?])", vec![json!(1), json!("a"), json!("b")])
            .unwrap();
        assert_eq!(f.to_sql(), "tags[:_1_] = ANY(ARRAY[:_2_, :_3_])");
    }

    #[test]
    fn test_bind_inline_mismatch() {
        let mut reg = BindRegister::default();
        let err = reg.bind_inline("a = ? AND b = ?", vec![json!(1)]).unwrap_err();
        assert_eq!(
            err,
            QueryError::PlaceholderMismatch {
                sql: "a = ? AND b = ?".to_string(),
                placeholders: 2,
                values: 1,
            }
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn test_named_overwrite_keeps_position() {
        let mut reg = BindRegister::default();
        reg.bind_named("a", 1).unwrap();
        reg.bind("x");
        reg.bind_named("a", 2).unwrap();
        let keys: Vec<_> = reg.values().keys().cloned().collect();
        assert_eq!(keys, vec![BindKey::Named("a".into()), BindKey::Seq(1)]);
        assert_eq!(reg.values().get_named("a"), Some(&json!(2)));
    }

    #[test]
    fn test_named_reject() {
        let mut reg = BindRegister::new(BindCollision::Reject);
        reg.bind_named("a", 1).unwrap();
        assert_eq!(
            reg.bind_named("a", 2).unwrap_err(),
            QueryError::DuplicateBind("a".into())
        );
        assert_eq!(reg.values().get_named("a"), Some(&json!(1)));
    }

    #[test]
    fn test_absorb_rekeys() {
        let mut sub = BindRegister::default();
        let sub_sql = sub.bind_inline("x = ? AND y = ?", vec![json!("s1"), json!("s2")]).unwrap();

        let mut parent = BindRegister::default();
        parent.bind("p1");
        let merged = parent.absorb(&sub_sql, sub.values()).unwrap();

        assert_eq!(merged.to_sql(), "x = :_2_ AND y = :_3_");
        let values: Vec<_> = parent.values().iter().map(|(_, v)| v.clone()).collect();
        assert_eq!(values, vec![json!("p1"), json!("s1"), json!("s2")]);
    }

    #[test]
    fn test_serialize_in_order() {
        let mut reg = BindRegister::default();
        reg.bind("bar");
        reg.bind_named("c1", 3).unwrap();
        let text = serde_json::to_string(reg.values()).unwrap();
        assert_eq!(text, r#"{"_1_":"bar","c1":3}"#);
    }
}
