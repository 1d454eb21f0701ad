//! WHERE / HAVING condition clauses.

use crate::fragment::Fragment;

/// How a condition joins the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    /// First condition of the clause.
    None,
    And,
    Or,
}

impl Connector {
    fn separator(self) -> &'static str {
        match self {
            Connector::None => "",
            Connector::And => "\n    AND ",
            Connector::Or => "\n    OR ",
        }
    }
}

/// Ordered `(connector, condition)` list.
///
/// The first condition never carries a connector, so a clause of `n`
/// conditions always renders `n - 1` connectors.
#[derive(Debug, Clone, Default)]
pub struct ConditionClause {
    items: Vec<(Connector, Fragment)>,
}

impl ConditionClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Append a condition joined with AND.
    pub fn add_and(&mut self, condition: Fragment) {
        self.add(Connector::And, condition);
    }

    /// Append a condition joined with OR.
    pub fn add_or(&mut self, condition: Fragment) {
        self.add(Connector::Or, condition);
    }

    fn add(&mut self, connector: Connector, condition: Fragment) {
        let connector = if self.items.is_empty() {
            Connector::None
        } else {
            connector
        };
        self.items.push((connector, condition));
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Render the conditions without a section header.
    pub fn render_body(&self) -> Fragment {
        let mut out = Fragment::new();
        for (connector, condition) in &self.items {
            out.push_str(connector.separator());
            out.append(condition);
        }
        out
    }

    /// Render `\n<header>\n    <conditions>`, or nothing when empty.
    pub fn render(&self, header: &str, out: &mut Fragment) {
        if self.is_empty() {
            return;
        }
        out.push_str("\n").push_str(header).push_str("\n    ");
        out.append(&self.render_body());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_connector_dropped() {
        let mut clause = ConditionClause::new();
        clause.add_or(Fragment::text("c1 = c2"));
        clause.add_or(Fragment::text("c3 = c4"));
        clause.add_and(Fragment::text("c5 = c6"));
        assert_eq!(
            clause.render_body().to_sql(),
            "c1 = c2\n    OR c3 = c4\n    AND c5 = c6"
        );
    }

    #[test]
    fn test_connector_count() {
        let mut clause = ConditionClause::new();
        for i in 0..5 {
            if i % 2 == 0 {
                clause.add_and(Fragment::text(format!("a{i}")));
            } else {
                clause.add_or(Fragment::text(format!("a{i}")));
            }
        }
        let sql = clause.render_body().to_sql();
        let connectors = sql.matches(" AND ").count() + sql.matches(" OR ").count();
        assert_eq!(connectors, clause.len() - 1);
        assert!(sql.starts_with("a0"));
    }

    #[test]
    fn test_empty_renders_nothing() {
        let clause = ConditionClause::new();
        let mut out = Fragment::text("SELECT");
        clause.render("WHERE", &mut out);
        assert_eq!(out.to_sql(), "SELECT");
    }

    #[test]
    fn test_render_with_header() {
        let mut clause = ConditionClause::new();
        clause.add_and(Fragment::text("a = 1"));
        let mut out = Fragment::text("SELECT");
        clause.render("HAVING", &mut out);
        assert_eq!(out.to_sql(), "SELECT\nHAVING\n    a = 1");
    }
}
