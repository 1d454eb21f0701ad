//! Dialect-specific row limiting.
//!
//! Pagination is kept as one `{limit, offset}` state; `page()` is a view that
//! recomputes both from the page size current at call time.

/// How a dialect limits SELECT rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStyle {
    /// `LIMIT n OFFSET m` as a trailing clause.
    LimitOffset,
    /// `TOP n` after the statement keyword, or `OFFSET m ROWS FETCH NEXT n ROWS ONLY`
    /// once an offset is set.
    TopOffsetFetch,
}

/// Which row-limiting clauses UPDATE and DELETE accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPaging {
    /// No ORDER BY / LIMIT / OFFSET.
    None,
    /// ORDER BY and LIMIT.
    Limit,
    /// ORDER BY, LIMIT and OFFSET.
    LimitOffset,
}

impl MutationPaging {
    /// Whether ORDER BY and LIMIT are accepted.
    pub fn allows_limit(self) -> bool {
        !matches!(self, MutationPaging::None)
    }

    /// Whether OFFSET is accepted.
    pub fn allows_offset(self) -> bool {
        matches!(self, MutationPaging::LimitOffset)
    }
}

/// Limit/offset state with a page-size view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    limit: u64,
    offset: u64,
    page_size: u64,
}

impl Paging {
    /// Create empty paging with the given page size.
    pub fn new(page_size: u64) -> Self {
        Self {
            limit: 0,
            offset: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn set_limit(&mut self, limit: u64) {
        self.limit = limit;
    }

    pub fn set_offset(&mut self, offset: u64) {
        self.offset = offset;
    }

    /// Change the page size used by later `set_page` calls (clamped to >= 1).
    pub fn set_page_size(&mut self, page_size: u64) {
        self.page_size = page_size.max(1);
    }

    /// Select a 1-based page. Page 0 clears limit and offset; the offset
    /// saturates at `u64::MAX`.
    pub fn set_page(&mut self, page: u64) {
        if page == 0 {
            self.limit = 0;
            self.offset = 0;
        } else {
            self.limit = self.page_size;
            self.offset = (page - 1).saturating_mul(self.page_size);
        }
    }

    /// Clear limit and offset, keeping the page size.
    pub fn reset(&mut self) {
        self.limit = 0;
        self.offset = 0;
    }

    /// Text emitted right after the statement keyword and flags (`TOP n`).
    pub fn prefix(&self, style: PaginationStyle) -> Option<String> {
        match style {
            PaginationStyle::TopOffsetFetch if self.limit > 0 && self.offset == 0 => {
                Some(format!("TOP {}", self.limit))
            }
            _ => None,
        }
    }

    /// Trailing clause (`LIMIT 10 OFFSET 40`, `OFFSET 40 ROWS FETCH NEXT 10 ROWS ONLY`).
    pub fn suffix(&self, style: PaginationStyle) -> Option<String> {
        match style {
            PaginationStyle::LimitOffset => {
                let mut parts = Vec::new();
                if self.limit > 0 {
                    parts.push(format!("LIMIT {}", self.limit));
                }
                if self.offset > 0 {
                    parts.push(format!("OFFSET {}", self.offset));
                }
                (!parts.is_empty()).then(|| parts.join(" "))
            }
            PaginationStyle::TopOffsetFetch => {
                if self.offset == 0 {
                    return None;
                }
                let mut clause = format!("OFFSET {} ROWS", self.offset);
                if self.limit > 0 {
                    clause.push_str(&format!(" FETCH NEXT {} ROWS ONLY", self.limit));
                }
                Some(clause)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_offset_clause() {
        let mut paging = Paging::new(10);
        assert_eq!(paging.suffix(PaginationStyle::LimitOffset), None);

        paging.set_limit(10);
        assert_eq!(paging.suffix(PaginationStyle::LimitOffset).as_deref(), Some("LIMIT 10"));

        paging.set_offset(40);
        assert_eq!(
            paging.suffix(PaginationStyle::LimitOffset).as_deref(),
            Some("LIMIT 10 OFFSET 40")
        );
    }

    #[test]
    fn test_offset_without_limit() {
        let mut paging = Paging::new(10);
        paging.set_offset(5);
        assert_eq!(paging.suffix(PaginationStyle::LimitOffset).as_deref(), Some("OFFSET 5"));
        assert_eq!(
            paging.suffix(PaginationStyle::TopOffsetFetch).as_deref(),
            Some("OFFSET 5 ROWS")
        );
    }

    #[test]
    fn test_top_switches_to_fetch() {
        let mut paging = Paging::new(10);
        paging.set_limit(10);
        assert_eq!(paging.prefix(PaginationStyle::TopOffsetFetch).as_deref(), Some("TOP 10"));
        assert_eq!(paging.suffix(PaginationStyle::TopOffsetFetch), None);

        paging.set_offset(40);
        assert_eq!(paging.prefix(PaginationStyle::TopOffsetFetch), None);
        assert_eq!(
            paging.suffix(PaginationStyle::TopOffsetFetch).as_deref(),
            Some("OFFSET 40 ROWS FETCH NEXT 10 ROWS ONLY")
        );
    }

    #[test]
    fn test_huge_page_saturates() {
        let mut paging = Paging::new(10);
        paging.set_page(u64::MAX);
        assert_eq!(paging.limit(), 10);
        assert_eq!(paging.offset(), u64::MAX);
    }

    #[test]
    fn test_page_matches_limit_offset() {
        let mut paged = Paging::new(10);
        paged.set_page(5);

        let mut direct = Paging::new(10);
        direct.set_limit(10);
        direct.set_offset(40);

        assert_eq!(paged, direct);
    }

    #[test]
    fn test_page_uses_current_page_size() {
        let mut paging = Paging::new(10);
        paging.set_page(3);
        paging.set_page_size(25);
        // Changing the size alone does not recompute.
        assert_eq!((paging.limit(), paging.offset()), (10, 20));

        paging.set_page(3);
        assert_eq!((paging.limit(), paging.offset()), (25, 50));
    }

    #[test]
    fn test_page_zero_clears() {
        let mut paging = Paging::new(10);
        paging.set_page(2);
        paging.set_page(0);
        assert_eq!(paging.suffix(PaginationStyle::LimitOffset), None);
    }
}
