//! Typed access to the visitor session.
//!
//! The session holds three things: the cart, the logged-in customer (if any),
//! and the queue of pending flash notices. Handlers go through [`ShopSession`]
//! instead of reading raw keys so that a missing value always has a
//! well-defined meaning (no cart means an empty cart, no customer means a
//! guest).

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use tower_sessions::Session;

use super::{Cart, CurrentCustomer, Flash};

/// Session keys.
pub mod session_keys {
    /// Key for the visitor's cart (melon id to quantity).
    pub const CART: &str = "cart";

    /// Key for storing the current logged-in customer.
    pub const CURRENT_CUSTOMER: &str = "current_customer";

    /// Key for pending flash notices.
    pub const FLASH: &str = "_flash";
}

/// Values every full page needs for its header and notice area.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub customer: Option<CurrentCustomer>,
    pub flashes: Vec<Flash>,
}

/// Typed wrapper around the `tower-sessions` session.
#[derive(Debug, Clone)]
pub struct ShopSession(Session);

impl ShopSession {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// The visitor's cart; empty if none has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails or the stored value cannot
    /// be decoded.
    pub async fn cart(&self) -> Result<Cart, tower_sessions::session::Error> {
        Ok(self
            .0
            .get::<Cart>(session_keys::CART)
            .await?
            .unwrap_or_default())
    }

    /// Replace the visitor's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn set_cart(&self, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
        self.0.insert(session_keys::CART, cart).await
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// The logged-in customer, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn current_customer(
        &self,
    ) -> Result<Option<CurrentCustomer>, tower_sessions::session::Error> {
        self.0.get(session_keys::CURRENT_CUSTOMER).await
    }

    /// Record a successful login.
    ///
    /// The session id is cycled first so a pre-login id cannot be reused.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn set_current_customer(
        &self,
        customer: &CurrentCustomer,
    ) -> Result<(), tower_sessions::session::Error> {
        self.0.cycle_id().await?;
        self.0
            .insert(session_keys::CURRENT_CUSTOMER, customer)
            .await
    }

    /// Forget the logged-in customer (logout). The cart is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn clear_current_customer(&self) -> Result<(), tower_sessions::session::Error> {
        self.0
            .remove::<CurrentCustomer>(session_keys::CURRENT_CUSTOMER)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Flash notices
    // =========================================================================

    /// Queue a notice for the next rendered page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn push_flash(&self, flash: Flash) -> Result<(), tower_sessions::session::Error> {
        let mut flashes = self
            .0
            .get::<Vec<Flash>>(session_keys::FLASH)
            .await?
            .unwrap_or_default();
        flashes.push(flash);
        self.0.insert(session_keys::FLASH, flashes).await
    }

    /// Drain all pending notices. A second call returns nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn take_flashes(&self) -> Result<Vec<Flash>, tower_sessions::session::Error> {
        Ok(self
            .0
            .remove::<Vec<Flash>>(session_keys::FLASH)
            .await?
            .unwrap_or_default())
    }

    /// Everything a full page render needs, draining the flash queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn page(&self) -> Result<PageContext, tower_sessions::session::Error> {
        Ok(PageContext {
            customer: self.current_customer().await?,
            flashes: self.take_flashes().await?,
        })
    }
}

impl<S> FromRequestParts<S> for ShopSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(Self)
            .ok_or((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Session layer is not installed",
            ))
    }
}
