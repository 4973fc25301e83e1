//! # Table Module
//!
//! The derived-state pipeline behind every list view: a search term narrows
//! the rows, a paginator cuts the narrowed rows into pages.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐    ┌────────────┐
//! │ source rows  │───►│ SearchFilter │───►│  Paginator   │───►│  Page<T>   │
//! │ (snapshot)   │    │ (substring)  │    │ (per_page)   │    │ (rendered) │
//! └──────────────┘    └──────────────┘    └──────────────┘    └────────────┘
//! ```
//!
//! Nothing here owns the rows. A view is recomputed from the snapshot each
//! time it is shown, so a refreshed snapshot never leaves stale pages.

use crate::types::{CatalogItem, Order, Product};
use crate::DEFAULT_PAGE_SIZE;

// =============================================================================
// Searchable
// =============================================================================

/// Rows that can be matched by a search term.
pub trait Searchable {
    /// Primary text matched by every search.
    fn search_name(&self) -> &str;

    /// Secondary text, matched only by [`SearchScope::NameOrDescription`].
    fn search_description(&self) -> &str {
        ""
    }
}

impl Searchable for CatalogItem {
    fn search_name(&self) -> &str {
        &self.name
    }

    fn search_description(&self) -> &str {
        &self.description
    }
}

impl Searchable for Product {
    fn search_name(&self) -> &str {
        &self.name
    }
}

impl Searchable for Order {
    fn search_name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// Search Filter
// =============================================================================

/// Which fields a search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Name only (bill catalog, admin products).
    #[default]
    Name,
    /// Name or description (inventory table).
    NameOrDescription,
}

/// Case-insensitive substring filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    needle: String,
    scope: SearchScope,
}

impl SearchFilter {
    pub fn new(term: &str, scope: SearchScope) -> Self {
        SearchFilter {
            needle: term.trim().to_lowercase(),
            scope,
        }
    }

    /// True when the filter lets every row through.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches<T: Searchable>(&self, row: &T) -> bool {
        if self.needle.is_empty() {
            return true;
        }

        if row.search_name().to_lowercase().contains(&self.needle) {
            return true;
        }

        self.scope == SearchScope::NameOrDescription
            && row.search_description().to_lowercase().contains(&self.needle)
    }

    /// Returns the matching rows in source order.
    pub fn apply<'a, T: Searchable>(&self, rows: &'a [T]) -> Vec<&'a T> {
        rows.iter().filter(|row| self.matches(*row)).collect()
    }
}

// =============================================================================
// Paginator
// =============================================================================

/// One rendered page of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Rows on this page, in source order.
    pub rows: Vec<&'a T>,
    /// 1-based page number actually shown.
    pub number: usize,
    /// Number of pages (0 when there are no rows).
    pub total_pages: usize,
    /// Number of rows across all pages.
    pub total_rows: usize,
}

impl<T> Page<'_, T> {
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Fixed-size pagination with a 1-based cursor.
///
/// ## Bounds
/// `next` and `previous` never move the cursor outside
/// `[1, total_pages]`. When the data shrinks under the cursor, views clamp
/// to the last page instead of showing an empty one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: usize,
    current_page: usize,
}

impl Paginator {
    /// Creates a paginator on page 1. A page size of 0 is treated as 1.
    pub fn new(per_page: usize) -> Self {
        Paginator {
            per_page: per_page.max(1),
            current_page: 1,
        }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// `ceil(total_rows / per_page)`.
    pub fn total_pages(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.per_page)
    }

    /// Advances one page if there is one. Returns whether the cursor moved.
    pub fn next(&mut self, total_rows: usize) -> bool {
        if self.current_page < self.total_pages(total_rows) {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Goes back one page if possible. Returns whether the cursor moved.
    pub fn previous(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Jumps to `page`, clamped to the valid range.
    pub fn go_to(&mut self, page: usize, total_rows: usize) {
        self.current_page = page.clamp(1, self.total_pages(total_rows).max(1));
    }

    /// Back to page 1.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Cuts the current page out of `rows`.
    pub fn page<'a, T>(&self, rows: &[&'a T]) -> Page<'a, T> {
        let total_rows = rows.len();
        let total_pages = self.total_pages(total_rows);
        let number = self.current_page.min(total_pages.max(1));

        let start = (number - 1) * self.per_page;
        let end = (start + self.per_page).min(total_rows);
        let rows = if start < total_rows {
            rows[start..end].to_vec()
        } else {
            Vec::new()
        };

        Page {
            rows,
            number,
            total_pages,
            total_rows,
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Paginator::new(DEFAULT_PAGE_SIZE)
    }
}

// =============================================================================
// Table State
// =============================================================================

/// Search term plus paginator for one list view.
///
/// Changing the search term sends the view back to page 1.
#[derive(Debug, Clone, Default)]
pub struct TableState {
    term: String,
    filter: SearchFilter,
    paginator: Paginator,
}

impl TableState {
    pub fn new(scope: SearchScope, per_page: usize) -> Self {
        TableState {
            term: String::new(),
            filter: SearchFilter::new("", scope),
            paginator: Paginator::new(per_page),
        }
    }

    pub fn search_term(&self) -> &str {
        &self.term
    }

    /// Sets the search term. Returns whether the effective filter changed.
    pub fn set_search(&mut self, term: &str) -> bool {
        let filter = SearchFilter::new(term, self.filter.scope);
        self.term = term.to_string();

        if filter == self.filter {
            return false;
        }

        self.filter = filter;
        self.paginator.reset();
        true
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn paginator_mut(&mut self) -> &mut Paginator {
        &mut self.paginator
    }

    /// Number of rows that pass the current filter.
    pub fn filtered_len<T: Searchable>(&self, rows: &[T]) -> usize {
        rows.iter().filter(|row| self.filter.matches(*row)).count()
    }

    /// Filters then paginates `rows`.
    pub fn view<'a, T: Searchable>(&self, rows: &'a [T]) -> Page<'a, T> {
        let filtered = self.filter.apply(rows);
        self.paginator.page(&filtered)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn items(n: usize) -> Vec<CatalogItem> {
        (1..=n)
            .map(|i| CatalogItem::new(i.to_string(), format!("Item {i}"), 5, Money::from_cents(100)))
            .collect()
    }

    #[test]
    fn test_search_scope_description() {
        let rows = vec![
            CatalogItem::new("1", "Stapler", 1, Money::zero()).with_description("Heavy duty"),
            CatalogItem::new("2", "Duster", 1, Money::zero()),
        ];

        let by_name = SearchFilter::new("duty", SearchScope::Name);
        assert!(by_name.apply(&rows).is_empty());

        let by_both = SearchFilter::new("DUTY", SearchScope::NameOrDescription);
        let hits: Vec<&str> = by_both.apply(&rows).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(hits, vec!["1"]);
    }

    #[test]
    fn test_total_pages() {
        let paginator = Paginator::new(5);
        assert_eq!(paginator.total_pages(0), 0);
        assert_eq!(paginator.total_pages(5), 1);
        assert_eq!(paginator.total_pages(6), 2);
        assert_eq!(Paginator::new(0).per_page(), 1);
    }

    #[test]
    fn test_next_and_previous_are_bounded() {
        let mut paginator = Paginator::new(5);
        assert!(!paginator.previous());
        assert!(paginator.next(12));
        assert!(paginator.next(12));
        assert!(!paginator.next(12));
        assert_eq!(paginator.current_page(), 3);
        assert!(paginator.previous());
        assert_eq!(paginator.current_page(), 2);
    }

    #[test]
    fn test_page_slices_rows() {
        let rows = items(12);
        let refs: Vec<&CatalogItem> = rows.iter().collect();

        let mut paginator = Paginator::new(5);
        paginator.go_to(3, rows.len());
        let page = paginator.page(&refs);

        assert_eq!(page.number, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_rows, 12);
        let ids: Vec<&str> = page.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["11", "12"]);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_page_clamps_when_rows_shrink() {
        let mut paginator = Paginator::new(5);
        paginator.go_to(3, 12);

        let rows = items(4);
        let refs: Vec<&CatalogItem> = rows.iter().collect();
        let page = paginator.page(&refs);
        assert_eq!(page.number, 1);
        assert_eq!(page.rows.len(), 4);
    }

    #[test]
    fn test_empty_rows_give_empty_page() {
        let paginator = Paginator::default();
        let page = paginator.page::<CatalogItem>(&[]);
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.rows.is_empty());
        assert!(!page.has_next());
    }

    #[test]
    fn test_search_change_resets_page() {
        let rows = items(12);
        let mut table = TableState::new(SearchScope::Name, 5);
        table.paginator_mut().next(rows.len());
        assert_eq!(table.paginator().current_page(), 2);

        assert!(table.set_search("item 1"));
        assert_eq!(table.paginator().current_page(), 1);

        // "Item 1", "Item 10", "Item 11", "Item 12"
        assert_eq!(table.filtered_len(&rows), 4);
        let page = table.view(&rows);
        assert_eq!(page.rows.len(), 4);

        // Same effective term: no reset
        table.paginator_mut().go_to(1, 4);
        assert!(!table.set_search("  ITEM 1 "));
        assert_eq!(table.search_term(), "  ITEM 1 ");
    }
}
