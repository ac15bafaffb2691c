//! Catalog loading: store configuration and product list.
//!
//! Two static JSON documents describe the shop:
//!
//! - `config.json` - business name, currency, contact channels, assistant
//!   texts, Telegram credentials
//! - `products.json` - the product list
//!
//! Both are fetched concurrently at startup, from a local directory or a
//! remote base URL. If either fails to load, parse, or validate, loading
//! fails as a whole; a partial catalog is never returned.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;
use serde::Deserialize;
use telecart_core::{Product, ProductError, ProductId, validate_products};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// File name of the store configuration document.
pub const CONFIG_DOCUMENT: &str = "config.json";

/// File name of the product list document.
pub const PRODUCTS_DOCUMENT: &str = "products.json";

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading a local document failed.
    #[error("failed to read {document}: {source}")]
    Io {
        document: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Fetching a remote document failed or returned a non-success status.
    #[error("failed to fetch {document}: {source}")]
    Http {
        document: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// A document is not valid JSON for its schema.
    #[error("failed to parse {document}: {source}")]
    Parse {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The product list is inconsistent.
    #[error("invalid product list: {0}")]
    InvalidProducts(#[from] ProductError),

    /// The remote base URL cannot be joined with a document name.
    #[error("invalid catalog URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Where the catalog documents live.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// A local directory containing both documents.
    Directory(PathBuf),
    /// A base URL; documents are fetched relative to it.
    Remote(Url),
}

// =============================================================================
// Store configuration
// =============================================================================

/// A direct contact channel offered for escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactType {
    Phone,
    Email,
    Whatsapp,
    Telegram,
}

impl ContactType {
    /// Parse the identifier used in `config.json`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "phone" => Some(Self::Phone),
            "email" => Some(Self::Email),
            "whatsapp" => Some(Self::Whatsapp),
            "telegram" => Some(Self::Telegram),
            _ => None,
        }
    }

    /// The identifier used in `config.json`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Whatsapp => "whatsapp",
            Self::Telegram => "telegram",
        }
    }
}

/// Canned texts for the shopping assistant.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AiResponses {
    /// Used by "Explain" when a product has no custom explanation.
    pub explain_product_default: String,
    /// Pool for "Help me choose"; one entry is picked at random.
    pub help_me_choose: Vec<String>,
}

/// Credentials for the Telegram bot that receives orders.
///
/// Implements `Debug` manually to redact the bot token.
#[derive(Clone)]
pub struct TelegramCredentials {
    /// Bot API token.
    pub bot_token: SecretString,
    /// Chat that receives order messages.
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Business settings from `config.json`. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub business_name: String,
    pub currency_symbol: String,
    pub logo_url: String,
    /// Shown above the direct-contact buttons.
    pub escalation_message: String,
    /// Channels offered for escalation, in display order.
    pub supported_contact_types: Vec<ContactType>,
    /// Contact value (number, address, handle) per channel.
    pub contact: HashMap<ContactType, String>,
    pub ai_responses: AiResponses,
    pub telegram: TelegramCredentials,
}

impl StoreConfig {
    /// Contact value configured for `kind`, if any.
    #[must_use]
    pub fn contact_value(&self, kind: ContactType) -> Option<&str> {
        self.contact
            .get(&kind)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

/// Wire format of `config.json`.
#[derive(Deserialize)]
struct StoreDocument {
    business_name: String,
    #[serde(default = "default_currency_symbol")]
    currency_symbol: String,
    #[serde(default)]
    logo_url: String,
    #[serde(default)]
    escalation_message: String,
    #[serde(default)]
    supported_contact_types: Vec<String>,
    #[serde(default)]
    contact: HashMap<String, String>,
    #[serde(default)]
    ai_responses: AiResponses,
    telegram_bot_token: String,
    telegram_chat_id: ChatIdDocument,
}

/// Telegram chat ids are written either as numbers or as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum ChatIdDocument {
    Number(i64),
    Text(String),
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl From<StoreDocument> for StoreConfig {
    fn from(doc: StoreDocument) -> Self {
        let supported_contact_types = doc
            .supported_contact_types
            .iter()
            .filter_map(|value| {
                let kind = ContactType::parse(value);
                if kind.is_none() {
                    warn!(contact_type = %value, "Ignoring unsupported contact type");
                }
                kind
            })
            .collect();

        let contact = doc
            .contact
            .into_iter()
            .filter_map(|(key, value)| ContactType::parse(&key).map(|kind| (kind, value)))
            .collect();

        let chat_id = match doc.telegram_chat_id {
            ChatIdDocument::Number(id) => id.to_string(),
            ChatIdDocument::Text(id) => id,
        };

        Self {
            business_name: doc.business_name,
            currency_symbol: doc.currency_symbol,
            logo_url: doc.logo_url,
            escalation_message: doc.escalation_message,
            supported_contact_types,
            contact,
            ai_responses: doc.ai_responses,
            telegram: TelegramCredentials {
                bot_token: SecretString::from(doc.telegram_bot_token),
                chat_id,
            },
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Store configuration plus product list, shared read-only.
///
/// Cheaply cloneable via `Arc`.
#[derive(Debug, Clone)]
pub struct Catalog {
    config: Arc<StoreConfig>,
    products: Arc<[Product]>,
}

impl Catalog {
    /// Build a catalog from already-parsed parts.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidProducts`] if product ids repeat.
    pub fn new(config: StoreConfig, products: Vec<Product>) -> Result<Self, CatalogError> {
        validate_products(&products)?;
        Ok(Self {
            config: Arc::new(config),
            products: products.into(),
        })
    }

    /// Parse a catalog from the raw text of both documents.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON and
    /// [`CatalogError::InvalidProducts`] for duplicate ids.
    pub fn from_documents(config_json: &str, products_json: &str) -> Result<Self, CatalogError> {
        let document: StoreDocument =
            serde_json::from_str(config_json).map_err(|source| CatalogError::Parse {
                document: CONFIG_DOCUMENT,
                source,
            })?;
        let products: Vec<Product> =
            serde_json::from_str(products_json).map_err(|source| CatalogError::Parse {
                document: PRODUCTS_DOCUMENT,
                source,
            })?;
        Self::new(document.into(), products)
    }

    /// Fetch and parse both documents concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first error from either fetch, or a parse/validation error.
    #[instrument(skip(client))]
    pub async fn load(source: &CatalogSource, client: &reqwest::Client) -> Result<Self, CatalogError> {
        let (config_json, products_json) = tokio::try_join!(
            fetch_document(source, client, CONFIG_DOCUMENT),
            fetch_document(source, client, PRODUCTS_DOCUMENT),
        )?;

        let catalog = Self::from_documents(&config_json, &products_json)?;
        info!(
            business = %catalog.config.business_name,
            products = catalog.products.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Store configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// All products, in document order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }
}

/// Read one document from the catalog source.
async fn fetch_document(
    source: &CatalogSource,
    client: &reqwest::Client,
    document: &'static str,
) -> Result<String, CatalogError> {
    match source {
        CatalogSource::Directory(dir) => {
            let path = dir.join(document);
            debug!(path = %path.display(), "Reading catalog document");
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| CatalogError::Io { document, source })
        }
        CatalogSource::Remote(base) => {
            let url = document_url(base, document)?;
            debug!(%url, "Fetching catalog document");
            let http_err = |source| CatalogError::Http { document, source };
            client
                .get(url)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(http_err)?
                .text()
                .await
                .map_err(http_err)
        }
    }
}

/// Resolve a document name against a base URL, treating the base as a directory.
fn document_url(base: &Url, document: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(document)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const CONFIG_JSON: &str = r#"{
        "business_name": "Corner Coffee",
        "currency_symbol": "€",
        "logo_url": "https://img.example/logo.png",
        "escalation_message": "Still unsure? Talk to us.",
        "supported_contact_types": ["whatsapp", "fax", "email"],
        "contact": {"whatsapp": "15550001111", "email": "hi@corner.example"},
        "ai_responses": {
            "explain_product_default": "A house favourite.",
            "help_me_choose": ["Try the cold brew.", "Go for the flat white."]
        },
        "telegram_bot_token": "123456:ABC-DEF",
        "telegram_chat_id": -1001234567890
    }"#;

    const PRODUCTS_JSON: &str = r#"[
        {"id": 1, "name": "Flat White", "description": "Silky", "price": 3.5,
         "image_url": "https://img.example/fw.jpg", "info": ["Hot"]},
        {"id": 2, "name": "Cold Brew", "description": "Slow", "price": 4,
         "image_url": "https://img.example/cb.jpg", "custom_explanation": "18 hours."}
    ]"#;

    #[test]
    fn test_from_documents() {
        let catalog = Catalog::from_documents(CONFIG_JSON, PRODUCTS_JSON).unwrap();
        let config = catalog.config();

        assert_eq!(config.business_name, "Corner Coffee");
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(
            config.supported_contact_types,
            vec![ContactType::Whatsapp, ContactType::Email]
        );
        assert_eq!(config.contact_value(ContactType::Email), Some("hi@corner.example"));
        assert_eq!(config.contact_value(ContactType::Phone), None);
        assert_eq!(config.ai_responses.help_me_choose.len(), 2);
        assert_eq!(config.telegram.chat_id, "-1001234567890");
        assert_eq!(config.telegram.bot_token.expose_secret(), "123456:ABC-DEF");

        assert_eq!(catalog.products().len(), 2);
        assert_eq!(
            catalog.product(ProductId::new(2)).map(|p| p.name.as_str()),
            Some("Cold Brew")
        );
        assert!(catalog.product(ProductId::new(9)).is_none());
    }

    #[test]
    fn test_string_chat_id() {
        let config = CONFIG_JSON.replace("-1001234567890", "\"@corner_orders\"");
        let catalog = Catalog::from_documents(&config, "[]").unwrap();
        assert_eq!(catalog.config().telegram.chat_id, "@corner_orders");
    }

    #[test]
    fn test_debug_redacts_bot_token() {
        let catalog = Catalog::from_documents(CONFIG_JSON, "[]").unwrap();
        let debug_output = format!("{:?}", catalog.config());
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("ABC-DEF"));
    }

    #[test]
    fn test_malformed_products_document() {
        let err = Catalog::from_documents(CONFIG_JSON, "{not json").unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Parse {
                document: PRODUCTS_DOCUMENT,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_required_config_field() {
        let err = Catalog::from_documents(r#"{"business_name": "x"}"#, PRODUCTS_JSON).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Parse {
                document: CONFIG_DOCUMENT,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_product_ids() {
        let products = r#"[
            {"id": 1, "name": "A", "price": 1},
            {"id": 1, "name": "B", "price": 2}
        ]"#;
        let err = Catalog::from_documents(CONFIG_JSON, products).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidProducts(_)));
    }

    #[test]
    fn test_document_url_treats_base_as_directory() {
        let base = Url::parse("https://cdn.example.com/shop").unwrap();
        assert_eq!(
            document_url(&base, CONFIG_DOCUMENT).unwrap().as_str(),
            "https://cdn.example.com/shop/config.json"
        );

        let base = Url::parse("https://cdn.example.com/shop/").unwrap();
        assert_eq!(
            document_url(&base, PRODUCTS_DOCUMENT).unwrap().as_str(),
            "https://cdn.example.com/shop/products.json"
        );
    }

    #[tokio::test]
    async fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_DOCUMENT), CONFIG_JSON).unwrap();
        std::fs::write(dir.path().join(PRODUCTS_DOCUMENT), PRODUCTS_JSON).unwrap();

        let source = CatalogSource::Directory(dir.path().to_path_buf());
        let catalog = Catalog::load(&source, &reqwest::Client::new()).await.unwrap();
        assert_eq!(catalog.products().len(), 2);
    }

    #[tokio::test]
    async fn test_load_fails_when_a_document_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_DOCUMENT), CONFIG_JSON).unwrap();

        let source = CatalogSource::Directory(dir.path().to_path_buf());
        let err = Catalog::load(&source, &reqwest::Client::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Io {
                document: PRODUCTS_DOCUMENT,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_load_from_remote() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shop/config.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CONFIG_JSON))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/shop/products.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PRODUCTS_JSON))
            .expect(1)
            .mount(&server)
            .await;

        let base = Url::parse(&format!("{}/shop", server.uri())).unwrap();
        let catalog = Catalog::load(&CatalogSource::Remote(base), &reqwest::Client::new())
            .await
            .unwrap();
        assert_eq!(catalog.config().business_name, "Corner Coffee");
        assert_eq!(catalog.products().len(), 2);
    }

    #[tokio::test]
    async fn test_load_from_remote_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/config.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CONFIG_JSON))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/products.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let base = Url::parse(&server.uri()).unwrap();
        let err = Catalog::load(&CatalogSource::Remote(base), &reqwest::Client::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Http {
                document: PRODUCTS_DOCUMENT,
                ..
            }
        ));
    }
}
