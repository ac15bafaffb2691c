//! Catalog page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use crate::routes::views::{LayoutView, ProductCardView};
use crate::services::order::ORDER_PLACED_NOTICE;
use crate::state::AppState;

/// One-shot notices that other pages redirect to the catalog with.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageNotice {
    OrderPlaced,
}

impl PageNotice {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::OrderPlaced => ORDER_PLACED_NOTICE,
        }
    }
}

/// Catalog query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub notice: Option<PageNotice>,
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogTemplate {
    pub layout: LayoutView,
    pub products: Vec<ProductCardView>,
    pub notice: Option<&'static str>,
}

/// Display the product grid.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> CatalogTemplate {
    let shop = state.shop();
    let symbol = shop.catalog().config().currency_symbol.as_str();

    CatalogTemplate {
        layout: LayoutView::load(shop).await,
        products: shop
            .catalog()
            .products()
            .iter()
            .map(|product| ProductCardView::new(product, symbol))
            .collect(),
        notice: query.notice.map(PageNotice::message),
    }
}
