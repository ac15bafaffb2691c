//! Shopping assistant panel and direct-contact escalation.
//!
//! The "assistant" is canned text from the store configuration: a product's
//! own explanation, a default explanation, or a random pick from the
//! "help me choose" pool. Every panel ends with buttons for the store's
//! direct contact channels.
//!
//! `compare_cart` does not compare anything. It is a shortcut that asks the
//! customer to confirm clearing the cart, and the name is kept because the
//! storefront's buttons already use it.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use telecart_core::Product;

use crate::catalog::{ContactType, StoreConfig};

/// Shown when `compare_cart` is used on an empty cart.
pub const CART_ALREADY_EMPTY_NOTICE: &str = "Cart is already empty!";

/// Confirmation prompt before the cart is cleared.
pub const CLEAR_CART_PROMPT: &str = "Are you sure you want to clear the entire cart?";

/// Shown after the cart has been cleared.
pub const CART_CLEARED_NOTICE: &str = "Cart cleared!";

/// Kind of help requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistKind {
    /// Explain one product.
    Explain,
    /// Suggest something from the pool.
    HelpMeChoose,
    /// Clear-cart shortcut (see module docs).
    CompareCart,
}

/// A link button to a direct contact channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactButton {
    pub kind: ContactType,
    pub href: String,
    pub label: &'static str,
    /// Font Awesome icon classes.
    pub icon: &'static str,
}

impl ContactButton {
    /// Button for `kind` reaching `value`.
    #[must_use]
    pub fn new(kind: ContactType, value: &str) -> Self {
        let value = value.trim();
        let (href, label, icon) = match kind {
            ContactType::Phone => (format!("tel:{value}"), "Call", "fas fa-phone"),
            ContactType::Email => (format!("mailto:{value}"), "Email", "fas fa-envelope"),
            ContactType::Whatsapp => (
                format!("https://wa.me/{value}"),
                "WhatsApp",
                "fab fa-whatsapp",
            ),
            ContactType::Telegram => (
                format!("https://t.me/{value}"),
                "Telegram",
                "fab fa-telegram",
            ),
        };
        Self {
            kind,
            href,
            label,
            icon,
        }
    }
}

/// Buttons for every supported channel that has a contact value, in the
/// configured order.
#[must_use]
pub fn escalation_buttons(config: &StoreConfig) -> Vec<ContactButton> {
    config
        .supported_contact_types
        .iter()
        .filter_map(|&kind| {
            config
                .contact_value(kind)
                .map(|value| ContactButton::new(kind, value))
        })
        .collect()
}

/// Explanation for `product`, or the default when it has none.
#[must_use]
pub fn explain_text<'a>(config: &'a StoreConfig, product: Option<&'a Product>) -> &'a str {
    product
        .and_then(|p| p.custom_explanation.as_deref())
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(config.ai_responses.explain_product_default.as_str())
}

/// A random suggestion from the pool, or the default explanation if the pool
/// is empty.
pub fn help_me_choose_text<'a, R>(config: &'a StoreConfig, rng: &mut R) -> &'a str
where
    R: Rng + ?Sized,
{
    config
        .ai_responses
        .help_me_choose
        .choose(rng)
        .map_or(config.ai_responses.explain_product_default.as_str(), String::as_str)
}

/// Assistant text plus escalation options.
#[derive(Debug, Clone)]
pub struct AssistPanel {
    pub text: String,
    pub escalation_message: String,
    pub buttons: Vec<ContactButton>,
}

impl AssistPanel {
    /// Panel showing `text` with the store's escalation options.
    #[must_use]
    pub fn new(config: &StoreConfig, text: &str) -> Self {
        Self {
            text: text.to_string(),
            escalation_message: config.escalation_message.clone(),
            buttons: escalation_buttons(config),
        }
    }
}

/// What the assistant decided to show.
#[derive(Debug, Clone)]
pub enum AssistOutcome {
    /// Text panel with contact buttons.
    Panel(AssistPanel),
    /// Ask before clearing a non-empty cart.
    ConfirmClearCart,
    /// Nothing to clear.
    CartAlreadyEmpty,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rust_decimal::Decimal;
    use secrecy::SecretString;
    use telecart_core::{Price, ProductId};

    use super::*;
    use crate::catalog::{AiResponses, TelegramCredentials};

    fn config() -> StoreConfig {
        StoreConfig {
            business_name: "Shop".to_string(),
            currency_symbol: "$".to_string(),
            logo_url: String::new(),
            escalation_message: "Talk to a human".to_string(),
            supported_contact_types: vec![
                ContactType::Telegram,
                ContactType::Phone,
                ContactType::Email,
            ],
            contact: HashMap::from([
                (ContactType::Phone, "+15550100".to_string()),
                (ContactType::Telegram, "cornercoffee".to_string()),
                (ContactType::Whatsapp, "15550100".to_string()),
            ]),
            ai_responses: AiResponses {
                explain_product_default: "Default explanation".to_string(),
                help_me_choose: vec!["Pick A".to_string(), "Pick B".to_string()],
            },
            telegram: TelegramCredentials {
                bot_token: SecretString::from("t".to_string()),
                chat_id: "1".to_string(),
            },
        }
    }

    fn product(explanation: Option<&str>) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Latte".to_string(),
            description: String::new(),
            price: Price::new(Decimal::ONE).unwrap(),
            image_url: String::new(),
            info: Vec::new(),
            custom_explanation: explanation.map(String::from),
        }
    }

    #[test]
    fn test_buttons_follow_configured_order_and_skip_missing_values() {
        let buttons = escalation_buttons(&config());
        let kinds: Vec<ContactType> = buttons.iter().map(|b| b.kind).collect();
        // Email is supported but has no value; WhatsApp has a value but is not supported.
        assert_eq!(kinds, vec![ContactType::Telegram, ContactType::Phone]);

        assert_eq!(buttons[0].href, "https://t.me/cornercoffee");
        assert_eq!(buttons[0].label, "Telegram");
        assert_eq!(buttons[1].href, "tel:+15550100");
        assert_eq!(buttons[1].icon, "fas fa-phone");
    }

    #[test]
    fn test_button_formats() {
        let email = ContactButton::new(ContactType::Email, "hi@shop.example");
        assert_eq!(email.href, "mailto:hi@shop.example");
        assert_eq!(email.icon, "fas fa-envelope");

        let whatsapp = ContactButton::new(ContactType::Whatsapp, " 15550100 ");
        assert_eq!(whatsapp.href, "https://wa.me/15550100");
        assert_eq!(whatsapp.label, "WhatsApp");
    }

    #[test]
    fn test_explain_prefers_custom_text() {
        let config = config();
        let custom = product(Some("Made with oat milk"));
        assert_eq!(explain_text(&config, Some(&custom)), "Made with oat milk");

        let plain = product(None);
        assert_eq!(explain_text(&config, Some(&plain)), "Default explanation");

        let blank = product(Some("  "));
        assert_eq!(explain_text(&config, Some(&blank)), "Default explanation");

        assert_eq!(explain_text(&config, None), "Default explanation");
    }

    #[test]
    fn test_help_me_choose_picks_from_pool() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let text = help_me_choose_text(&config, &mut rng);
            assert!(text == "Pick A" || text == "Pick B");
        }
    }

    #[test]
    fn test_help_me_choose_with_empty_pool() {
        let mut config = config();
        config.ai_responses.help_me_choose.clear();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(help_me_choose_text(&config, &mut rng), "Default explanation");
    }

    #[test]
    fn test_panel_carries_escalation() {
        let panel = AssistPanel::new(&config(), "hello");
        assert_eq!(panel.text, "hello");
        assert_eq!(panel.escalation_message, "Talk to a human");
        assert_eq!(panel.buttons.len(), 2);
    }

    #[test]
    fn test_assist_kind_names() {
        let kind: AssistKind = serde_json::from_str("\"help_me_choose\"").unwrap();
        assert_eq!(kind, AssistKind::HelpMeChoose);
        let kind: AssistKind = serde_json::from_str("\"compare_cart\"").unwrap();
        assert_eq!(kind, AssistKind::CompareCart);
    }
}
