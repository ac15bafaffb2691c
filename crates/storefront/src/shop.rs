//! The shop controller.
//!
//! [`Shop`] owns everything a customer session touches: the catalog, the
//! cart, the persistent store, and the Telegram client. It is built once at
//! startup and shared through [`crate::state::AppState`]; route handlers call
//! its methods and never touch the cart or the store directly.
//!
//! Cart mutations are write-through. Each one is applied to a copy of the
//! cart, the copy is saved, and only then does it replace the in-memory cart,
//! so memory and storage never disagree after a failed write. Store access
//! runs on the blocking thread pool.

use std::sync::Arc;

use telecart_core::{Cart, CartError, ContactInfo, ProductId};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use crate::catalog::Catalog;
use crate::services::assist::{self, AssistKind, AssistOutcome, AssistPanel};
use crate::services::order::{
    OrderError, OrderForm, SubmissionPhase, SubmissionState, format_order_message,
};
use crate::store::{PersistentStore, StoreError};
use crate::telegram::TelegramClient;

/// Errors from cart and contact operations.
#[derive(Debug, Error)]
pub enum ShopError {
    /// The request does not fit the cart or catalog.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Persisting the change failed; in-memory state is unchanged.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Application controller for a single-customer storefront.
#[derive(Debug)]
pub struct Shop {
    catalog: Catalog,
    store: Arc<PersistentStore>,
    telegram: TelegramClient,
    cart: Mutex<Cart>,
    submission: SubmissionState,
}

impl Shop {
    /// Create the controller, restoring the cart from storage.
    #[must_use]
    pub fn new(catalog: Catalog, store: PersistentStore, telegram: TelegramClient) -> Self {
        let cart = store.load_cart();
        info!(
            lines = cart.len(),
            items = cart.count(),
            "Cart restored from storage"
        );

        Self {
            catalog,
            store: Arc::new(store),
            telegram,
            cart: Mutex::new(cart),
            submission: SubmissionState::default(),
        }
    }

    /// The loaded catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// A snapshot of the current cart.
    pub async fn cart(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    /// Total item count for the cart badge.
    pub async fn cart_count(&self) -> u64 {
        self.cart.lock().await.count()
    }

    // =========================================================================
    // Cart operations
    // =========================================================================

    /// Add one unit of a catalog product. Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] if the id is not in the catalog
    /// (the cart is not touched), or a storage error if saving fails.
    #[instrument(skip(self))]
    pub async fn add_item(&self, product_id: ProductId) -> Result<u32, ShopError> {
        let product = self
            .catalog
            .product(product_id)
            .ok_or(CartError::UnknownProduct(product_id))?;

        let mut cart = self.cart.lock().await;
        let mut next = cart.clone();
        let quantity = next.add_item(product);
        self.commit(&mut cart, next).await?;

        info!(%product_id, quantity, "Added to cart");
        Ok(quantity)
    }

    /// Change a line's quantity by `delta`, removing it at zero.
    ///
    /// Returns the new quantity (0 if removed), or `None` when the product is
    /// not in the cart, in which case nothing is written.
    ///
    /// # Errors
    ///
    /// Returns a storage error if saving fails.
    #[instrument(skip(self))]
    pub async fn adjust_quantity(
        &self,
        product_id: ProductId,
        delta: i64,
    ) -> Result<Option<u32>, ShopError> {
        let mut cart = self.cart.lock().await;
        if cart.line(product_id).is_none() {
            return Ok(None);
        }

        let mut next = cart.clone();
        let quantity = next.adjust_quantity(product_id, delta);
        self.commit(&mut cart, next).await?;
        Ok(quantity)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a storage error if saving fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), ShopError> {
        let mut cart = self.cart.lock().await;
        self.commit(&mut cart, Cart::new()).await?;
        info!("Cart cleared");
        Ok(())
    }

    async fn commit(&self, cart: &mut Cart, next: Cart) -> Result<(), StoreError> {
        let saved = next.clone();
        self.with_store(move |store| store.save_cart(&saved)).await??;
        *cart = next;
        Ok(())
    }

    /// Run a store operation on the blocking pool.
    async fn with_store<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&PersistentStore) -> T + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        Ok(tokio::task::spawn_blocking(move || op(&store)).await?)
    }

    // =========================================================================
    // Contact details
    // =========================================================================

    /// Saved contact details, if any.
    pub async fn saved_contact(&self) -> Option<ContactInfo> {
        self.with_store(PersistentStore::load_contact_info)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to read saved contact info");
                None
            })
    }

    /// A checkout form pre-filled from saved contact details.
    ///
    /// The message field is always empty.
    pub async fn checkout_form(&self) -> OrderForm {
        self.saved_contact()
            .await
            .map(|info| OrderForm::from_contact(&info))
            .unwrap_or_default()
    }

    /// Delete the saved contact details.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the record cannot be removed.
    #[instrument(skip(self))]
    pub async fn forget_contact_info(&self) -> Result<(), ShopError> {
        self.with_store(PersistentStore::clear_contact_info).await??;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Whether an order is currently being sent.
    #[must_use]
    pub fn submission_phase(&self) -> SubmissionPhase {
        self.submission.phase()
    }

    /// Send the current cart as an order.
    ///
    /// Contact details are saved before the send is attempted. On delivery the
    /// ordered lines are taken out of the cart; anything added while the order
    /// was in flight stays. On failure the cart is left exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`OrderError::AlreadySending`]: another submission is in flight
    /// - [`OrderError::EmptyCart`] / [`OrderError::MissingField`]: rejected
    ///   before any network activity
    /// - [`OrderError::Delivery`]: Telegram did not accept the message
    #[instrument(skip(self, form))]
    pub async fn submit_order(&self, form: &OrderForm) -> Result<(), OrderError> {
        let _sending = self.submission.begin().ok_or(OrderError::AlreadySending)?;

        let ordered = self.cart().await;
        if ordered.is_empty() {
            info!("Checkout rejected: cart is empty");
            return Err(OrderError::EmptyCart);
        }
        form.validate()?;

        let contact = form.contact_info();
        let saved = contact.clone();
        match self.with_store(move |store| store.save_contact_info(&saved)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) | Err(e) => {
                warn!(error = %e, "Failed to save contact info; sending order anyway");
            }
        }

        let text = format_order_message(self.catalog.config(), &contact, &form.message, &ordered);
        self.telegram.send_message(&text).await?;

        info!(
            lines = ordered.len(),
            items = ordered.count(),
            total = %ordered.total(),
            "Order delivered"
        );

        // The order is out; a failed write must not make the customer resend it.
        let mut cart = self.cart.lock().await;
        let mut next = cart.clone();
        next.subtract(&ordered);
        if let Err(e) = self.commit(&mut cart, next.clone()).await {
            let event_id = sentry::capture_error(&e);
            error!(
                error = %e,
                sentry_event_id = %event_id,
                "Failed to persist cart after order"
            );
            *cart = next;
        }

        Ok(())
    }

    // =========================================================================
    // Assistant
    // =========================================================================

    /// Decide what the assistant panel shows.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] when `explain` names a product
    /// that is not in the catalog.
    #[instrument(skip(self))]
    pub async fn assist(
        &self,
        kind: AssistKind,
        product_id: Option<ProductId>,
    ) -> Result<AssistOutcome, ShopError> {
        let config = self.catalog.config();
        match kind {
            AssistKind::Explain => {
                let product = product_id
                    .map(|id| self.catalog.product(id).ok_or(CartError::UnknownProduct(id)))
                    .transpose()?;
                let text = assist::explain_text(config, product);
                Ok(AssistOutcome::Panel(AssistPanel::new(config, text)))
            }
            AssistKind::HelpMeChoose => {
                let text = {
                    let mut rng = rand::rng();
                    assist::help_me_choose_text(config, &mut rng).to_string()
                };
                Ok(AssistOutcome::Panel(AssistPanel::new(config, &text)))
            }
            AssistKind::CompareCart => {
                if self.cart.lock().await.is_empty() {
                    Ok(AssistOutcome::CartAlreadyEmpty)
                } else {
                    Ok(AssistOutcome::ConfirmClearCart)
                }
            }
        }
    }

    /// Clear the cart after the customer confirmed the `compare_cart` prompt.
    ///
    /// Returns `false` if the cart was already empty.
    ///
    /// # Errors
    ///
    /// Returns a storage error if saving fails.
    pub async fn confirm_clear_cart(&self) -> Result<bool, ShopError> {
        let mut cart = self.cart.lock().await;
        if cart.is_empty() {
            return Ok(false);
        }
        self.commit(&mut cart, Cart::new()).await?;
        info!("Cart cleared from assistant");
        Ok(true)
    }
}
