//! Order placement from the persisted cart.

use elegance_core::checkout::{CheckoutError, CheckoutForm, build_order};
use elegance_core::models::{Order, User};
use tracing::{info, instrument, warn};

use super::{CartService, WorkflowError};
use crate::api::ApiClient;
use crate::store::{CHECKOUT_DRAFT_KEY, LocalStore};

/// Checkout against the cart held in the local store.
#[derive(Clone)]
pub struct CheckoutService {
    client: ApiClient,
    store: LocalStore,
    cart: CartService,
}

impl CheckoutService {
    #[must_use]
    pub fn new(client: ApiClient, store: LocalStore) -> Self {
        Self {
            client,
            cart: CartService::new(store.clone()),
            store,
        }
    }

    /// The signed-in user, if the token is still accepted.
    async fn current_user(&self) -> Option<User> {
        if !self.client.is_signed_in().await {
            return None;
        }
        match self.client.me().await {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Checking out as guest");
                None
            }
        }
    }

    /// Form values to start from: the signed-in user's details over the
    /// last draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be read.
    pub async fn initial_form(&self) -> Result<CheckoutForm, WorkflowError> {
        let draft: Option<CheckoutForm> = self.store.get(CHECKOUT_DRAFT_KEY)?;
        let user = self.current_user().await;
        Ok(CheckoutForm::prefill(user.as_ref(), draft.as_ref()))
    }

    /// Validate the form, submit the order and empty the cart.
    ///
    /// The draft is saved before submitting so a failed attempt can be
    /// retried; it is cleared together with the cart once the order is
    /// accepted. Once the backend has accepted the order this returns `Ok`
    /// even if clearing the local state fails; that failure is only logged.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] when there is nothing to buy, the
    /// first validation failure, or the backend's rejection.
    #[instrument(skip(self, form))]
    pub async fn place_order(&self, form: &CheckoutForm) -> Result<Order, WorkflowError> {
        let cart = self.cart.load()?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart.into());
        }

        self.store.set(CHECKOUT_DRAFT_KEY, form)?;

        let user_id = self.current_user().await.map(|user| user.id);
        let order = build_order(form, &cart, user_id)?;
        let placed = self.client.create_order(&order).await?;

        // The order exists from here on; failing now would invite a duplicate.
        if let Err(e) = self.store.remove(CHECKOUT_DRAFT_KEY) {
            warn!(order_id = ?placed.id, error = %e, "Failed to clear checkout draft");
        }
        if let Err(e) = self.cart.clear() {
            warn!(order_id = ?placed.id, error = %e, "Failed to clear cart after checkout");
        }
        info!(order_id = ?placed.id, total = %placed.total, "Checkout complete");
        Ok(placed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::config::ClientConfig;

    use super::*;

    #[tokio::test]
    async fn test_empty_cart_is_refused_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        let client = ApiClient::new(ClientConfig::new("http://127.0.0.1:9").unwrap()).unwrap();

        let err = CheckoutService::new(client, store.clone())
            .place_order(&CheckoutForm::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Checkout(CheckoutError::EmptyCart)
        ));
        assert_eq!(store.get::<CheckoutForm>(CHECKOUT_DRAFT_KEY).unwrap(), None);
    }
}
