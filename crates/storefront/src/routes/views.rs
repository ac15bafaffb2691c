//! Display data for templates.
//!
//! Templates never see domain types with money in them; prices are formatted
//! here with the store's currency symbol.

use telecart_core::{Cart, CartLine, Product, format_amount};

use crate::catalog::StoreConfig;
use crate::shop::Shop;

/// Header data shared by every full page.
#[derive(Clone)]
pub struct LayoutView {
    pub business_name: String,
    pub logo_url: String,
    pub cart_count: u64,
}

impl LayoutView {
    /// Header for the current shop state.
    pub async fn load(shop: &Shop) -> Self {
        let config = shop.catalog().config();
        Self {
            business_name: config.business_name.clone(),
            logo_url: config.logo_url.clone(),
            cart_count: shop.cart_count().await,
        }
    }
}

/// Product card in the catalog grid.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
    pub info: Vec<String>,
}

impl ProductCardView {
    #[must_use]
    pub fn new(product: &Product, symbol: &str) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(symbol),
            image_url: product.image_url.clone(),
            info: product.info.clone(),
        }
    }
}

/// Cart line display data.
#[derive(Clone)]
pub struct CartLineView {
    pub id: i64,
    pub name: String,
    pub image_url: String,
    pub quantity: u32,
    pub price: String,
    pub subtotal: String,
}

impl CartLineView {
    fn new(line: &CartLine, symbol: &str) -> Self {
        Self {
            id: line.product_id().as_i64(),
            name: line.product.name.clone(),
            image_url: line.product.image_url.clone(),
            quantity: line.quantity(),
            price: line.product.price.display(symbol),
            subtotal: format_amount(symbol, line.subtotal()),
        }
    }
}

/// Cart display data.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u64,
    pub is_empty: bool,
}

impl CartView {
    #[must_use]
    pub fn new(cart: &Cart, config: &StoreConfig) -> Self {
        let symbol = config.currency_symbol.as_str();
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| CartLineView::new(line, symbol))
                .collect(),
            total: cart.display_total(symbol),
            item_count: cart.count(),
            is_empty: cart.is_empty(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashMap;

    use rust_decimal::Decimal;
    use secrecy::SecretString;
    use telecart_core::{Price, ProductId};

    use super::*;
    use crate::catalog::{AiResponses, TelegramCredentials};

    fn config() -> StoreConfig {
        StoreConfig {
            business_name: "Shop".to_string(),
            currency_symbol: "€".to_string(),
            logo_url: String::new(),
            escalation_message: String::new(),
            supported_contact_types: Vec::new(),
            contact: HashMap::new(),
            ai_responses: AiResponses::default(),
            telegram: TelegramCredentials {
                bot_token: SecretString::from("t".to_string()),
                chat_id: "1".to_string(),
            },
        }
    }

    #[test]
    fn test_cart_view_formats_money() {
        let product = Product {
            id: ProductId::new(3),
            name: "Tea".to_string(),
            description: String::new(),
            price: Price::new(Decimal::new(850, 2)).unwrap(),
            image_url: String::new(),
            info: Vec::new(),
            custom_explanation: None,
        };
        let mut cart = Cart::new();
        cart.add_item(&product);
        cart.add_item(&product);
        cart.add_item(&product);

        let view = CartView::new(&cart, &config());
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].price, "€8.50");
        assert_eq!(view.lines[0].subtotal, "€25.50");
        assert_eq!(view.total, "€25.50");
        assert_eq!(view.item_count, 3);
        assert!(!view.is_empty);
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::new(&Cart::new(), &config());
        assert!(view.is_empty);
        assert_eq!(view.total, "€0.00");
    }
}
