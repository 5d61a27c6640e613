//! Catalog page: filterable, searchable, paginated product list plus the cart.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pocket_shop_core::listing::{ALL_CATEGORIES, PAGE_SIZES};
use pocket_shop_core::{Cart, Catalog, ListingPage, ListingQuery, Product, ProductId};
use serde::Deserialize;
use tracing::instrument;

use super::cart::CartView;
use crate::cart_store::StoredCart;
use crate::filters;
use crate::state::AppState;

/// Message shown when the catalog cannot be fetched.
pub const CATALOG_UNAVAILABLE: &str = "Failed to load products. Please try again later.";

/// Catalog query parameters.
///
/// Numbers are taken as text so a mangled URL degrades to defaults instead of
/// a 400.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub category: Option<String>,
    pub q: Option<String>,
    pub per_page: Option<String>,
    pub page: Option<String>,
}

impl CatalogParams {
    /// Normalize into a listing query.
    #[must_use]
    pub fn listing_query(&self) -> ListingQuery {
        ListingQuery::from_params(
            self.category.as_deref(),
            self.q.as_deref(),
            self.per_page.as_deref().and_then(|v| v.trim().parse().ok()),
            self.page.as_deref().and_then(|v| v.trim().parse().ok()),
        )
    }
}

/// Catalog page URL for a listing query.
#[must_use]
pub fn listing_href(query: &ListingQuery) -> String {
    format!(
        "/?category={}&q={}&per_page={}&page={}",
        urlencoding::encode(&query.category),
        urlencoding::encode(&query.search),
        query.per_page,
        query.page
    )
}

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: ProductId,
    pub title: String,
    pub price: String,
    pub category: String,
    pub thumbnail: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.unit_price().to_string(),
            category: product.category.clone(),
            thumbnail: (!product.thumbnail.is_empty()).then(|| product.thumbnail.clone()),
        }
    }
}

/// One entry of a `<select>`.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// A numbered page link.
#[derive(Debug, Clone)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// Pagination controls. A `None` href renders as a disabled button.
#[derive(Debug, Clone)]
pub struct PaginationView {
    pub page: usize,
    pub page_count: usize,
    pub total_matches: usize,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
    pub pages: Vec<PageLink>,
}

impl PaginationView {
    fn new(query: &ListingQuery, listing: &ListingPage<'_>) -> Self {
        let at = |page: usize| listing_href(&query.clone().with_page(page));

        Self {
            page: listing.page,
            page_count: listing.page_count,
            total_matches: listing.total_matches,
            previous_href: listing.has_previous().then(|| at(listing.page - 1)),
            next_href: listing.has_next().then(|| at(listing.page + 1)),
            pages: (1..=listing.page_count)
                .map(|number| PageLink {
                    number,
                    href: at(number),
                    current: number == listing.page,
                })
                .collect(),
        }
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogTemplate {
    pub categories: Vec<SelectOption>,
    pub page_sizes: Vec<SelectOption>,
    pub search: String,
    pub products: Vec<ProductView>,
    pub pagination: PaginationView,
    pub cart: CartView,
    pub error: Option<String>,
    /// Where cart forms send the customer back to.
    pub return_to: String,
}

impl CatalogTemplate {
    /// Build the page for `query` over `catalog`.
    #[must_use]
    pub fn new(catalog: &Catalog, query: &ListingQuery, cart: &Cart, error: Option<String>) -> Self {
        let listing = query.apply(&catalog.products);
        // The page actually shown may differ from the one requested (clamping).
        let shown = query.clone().with_page(listing.page);

        let categories = std::iter::once((ALL_CATEGORIES, "All"))
            .chain(catalog.categories().into_iter().map(|c| (c, c)))
            .map(|(value, label)| SelectOption {
                value: value.to_string(),
                label: label.to_string(),
                selected: value == query.category,
            })
            .collect();

        let page_sizes = PAGE_SIZES
            .iter()
            .map(|size| SelectOption {
                value: size.to_string(),
                label: size.to_string(),
                selected: *size == query.per_page,
            })
            .collect();

        Self {
            categories,
            page_sizes,
            search: query.search.clone(),
            products: listing.items.iter().copied().map(ProductView::from).collect(),
            pagination: PaginationView::new(query, &listing),
            cart: CartView::from(cart),
            error,
            return_to: listing_href(&shown),
        }
    }
}

/// Display the catalog page.
///
/// A failed catalog fetch still renders the page, with an error message and
/// no products, so the cart stays usable.
#[instrument(skip(state, cart))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
    StoredCart(cart): StoredCart,
) -> Response {
    let query = params.listing_query();

    match state.catalog().fetch_catalog().await {
        Ok(catalog) => CatalogTemplate::new(&catalog, &query, &cart, None).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch catalog");
            let empty = Catalog::default();
            (
                StatusCode::BAD_GATEWAY,
                CatalogTemplate::new(&empty, &query, &cart, Some(CATALOG_UNAVAILABLE.to_string())),
            )
                .into_response()
        }
    }
}
