//! Product listing pipeline: category filter, title search, pagination.
//!
//! ```text
//! products -> category filter -> title search -> page slice
//! ```
//!
//! Every stage is a pure function over borrowed products, so a listing can be
//! recomputed for each request from the freshly fetched catalog.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// Category value that disables the category filter.
pub const ALL_CATEGORIES: &str = "all";

/// Page sizes offered by the items-per-page selector.
pub const PAGE_SIZES: [usize; 4] = [5, 10, 20, 30];

/// Page size used when none (or an unsupported one) is requested.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// View filters for the product list.
///
/// Queries are rebuilt from request parameters on every page load. Filter
/// forms never carry a page number, so changing the category, search text, or
/// page size lands on the first page; only [`ListingQuery::with_page`] moves
/// between pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    pub category: String,
    pub search: String,
    pub per_page: usize,
    /// 1-based page number.
    pub page: usize,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.to_string(),
            search: String::new(),
            per_page: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

impl ListingQuery {
    /// Build a query from loosely-typed request parameters.
    ///
    /// Missing values take their defaults, an unsupported page size falls back
    /// to [`DEFAULT_PAGE_SIZE`], and page `0` becomes page `1`.
    #[must_use]
    pub fn from_params(
        category: Option<&str>,
        search: Option<&str>,
        per_page: Option<usize>,
        page: Option<usize>,
    ) -> Self {
        let category = match category.map(str::trim) {
            None | Some("") => ALL_CATEGORIES.to_string(),
            Some(c) => c.to_string(),
        };
        let per_page = per_page
            .filter(|n| PAGE_SIZES.contains(n))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self {
            category,
            search: search.unwrap_or_default().trim().to_string(),
            per_page,
            page: page.unwrap_or(1).max(1),
        }
    }

    /// Move to another page, keeping every filter.
    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Whether the category filter is active.
    #[must_use]
    pub fn filters_category(&self) -> bool {
        !self.category.is_empty() && self.category != ALL_CATEGORIES
    }

    /// Run the full pipeline over `products`.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> ListingPage<'a> {
        let matches: Vec<&Product> = products
            .iter()
            .filter(|p| !self.filters_category() || p.category == self.category)
            .filter(|p| title_matches(&p.title, &self.search))
            .collect();

        paginate(matches, self.per_page, self.page)
    }
}

/// Case-insensitive substring match on a product title.
///
/// Blank search text matches every title.
#[must_use]
pub fn title_matches(title: &str, search: &str) -> bool {
    let needle = search.trim();
    needle.is_empty() || title.to_lowercase().contains(&needle.to_lowercase())
}

/// Number of pages needed to show `total` items, `per_page` at a time.
#[must_use]
pub const fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// Slice one page out of the filtered matches.
///
/// `page` is clamped to the valid range so a stale or hand-edited URL still
/// lands on a real page.
#[must_use]
pub fn paginate(matches: Vec<&Product>, per_page: usize, page: usize) -> ListingPage<'_> {
    let per_page = per_page.max(1);
    let total_matches = matches.len();
    let page_count = page_count(total_matches, per_page);
    let page = page.clamp(1, page_count.max(1));

    let items = matches
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    ListingPage {
        items,
        page,
        per_page,
        page_count,
        total_matches,
    }
}

/// One page of listing results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage<'a> {
    /// Products on this page.
    pub items: Vec<&'a Product>,
    /// 1-based page number actually shown.
    pub page: usize,
    pub per_page: usize,
    /// Total pages; `0` when nothing matched.
    pub page_count: usize,
    /// Products that passed the category and search filters.
    pub total_matches: usize,
}

impl ListingPage<'_> {
    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::ProductId;

    fn product(id: u32, title: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Decimal::new(1000, 2),
            category: category.to_string(),
            thumbnail: String::new(),
        }
    }

    fn numbered(count: u32) -> Vec<Product> {
        (1..=count)
            .map(|i| product(i, &format!("Item {i}"), "misc"))
            .collect()
    }

    fn ids(page: &ListingPage<'_>) -> Vec<u32> {
        page.items.iter().map(|p| p.id.get()).collect()
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(12, 5), 3);
        assert_eq!(page_count(10, 5), 2);
        assert_eq!(page_count(1, 5), 1);
        assert_eq!(page_count(0, 5), 0);
    }

    #[test]
    fn test_last_page_holds_remainder() {
        let products = numbered(12);
        let query = ListingQuery::default().with_page(3);
        let page = query.apply(&products);

        assert_eq!(page.page_count, 3);
        assert_eq!(ids(&page), vec![11, 12]);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_exactly_divisible_has_no_empty_page() {
        let products = numbered(10);
        let query = ListingQuery::default();

        let first = query.apply(&products);
        assert_eq!(first.page_count, 2);
        assert_eq!(ids(&first), vec![1, 2, 3, 4, 5]);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let second = query.with_page(2).apply(&products);
        assert_eq!(ids(&second), vec![6, 7, 8, 9, 10]);
        assert!(!second.has_next());
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let products = numbered(12);
        let page = ListingQuery::default().with_page(99).apply(&products);
        assert_eq!(page.page, 3);
        assert_eq!(ids(&page), vec![11, 12]);
    }

    #[test]
    fn test_no_matches() {
        let products = numbered(4);
        let page = ListingQuery::from_params(None, Some("nothing"), None, None).apply(&products);
        assert_eq!(page.total_matches, 0);
        assert_eq!(page.page_count, 0);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_category_then_search() {
        let products = vec![
            product(1, "ABC Lipstick", "beauty"),
            product(2, "abc perfume", "fragrances"),
            product(3, "Blush xAbCx", "beauty"),
            product(4, "Mascara", "beauty"),
        ];
        let query = ListingQuery::from_params(Some("beauty"), Some("abc"), None, None);
        let page = query.apply(&products);

        assert_eq!(ids(&page), vec![1, 3]);
        assert_eq!(page.total_matches, 2);
    }

    #[test]
    fn test_all_category_keeps_everything() {
        let products = vec![product(1, "A", "x"), product(2, "B", "y")];
        let page = ListingQuery::default().apply(&products);
        assert_eq!(ids(&page), vec![1, 2]);
    }

    #[test]
    fn test_filter_params_without_page_start_at_first_page() {
        let query = ListingQuery::from_params(Some("beauty"), Some("lip"), Some(10), None);
        assert_eq!(query.page, 1);
        assert_eq!(query.clone().with_page(4).page, 4);
        assert_eq!(query.with_page(0).page, 1);
    }

    #[test]
    fn test_from_params_defaults_and_fallbacks() {
        let query = ListingQuery::from_params(None, None, None, None);
        assert_eq!(query, ListingQuery::default());

        let query = ListingQuery::from_params(Some(""), Some("  lip "), Some(7), Some(0));
        assert_eq!(query.category, ALL_CATEGORIES);
        assert_eq!(query.search, "lip");
        assert_eq!(query.per_page, DEFAULT_PAGE_SIZE);
        assert_eq!(query.page, 1);

        let query = ListingQuery::from_params(Some("beauty"), None, Some(20), Some(2));
        assert_eq!(query.category, "beauty");
        assert_eq!(query.per_page, 20);
        assert_eq!(query.page, 2);
    }

    #[test]
    fn test_title_matches() {
        assert!(title_matches("Red Lipstick", "LIP"));
        assert!(title_matches("Red Lipstick", ""));
        assert!(title_matches("Red Lipstick", "   "));
        assert!(!title_matches("Red Lipstick", "blue"));
    }
}
