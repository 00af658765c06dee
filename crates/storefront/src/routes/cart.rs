//! Cart route handlers.
//!
//! The cart lives in the session as melon id to quantity; prices are resolved
//! against the catalog on every render.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tracing::instrument;

use super::melons::find_melon;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::{CartSummary, Flash, PageContext, ShopSession};
use crate::state::AppState;

/// Notice shown when a shopper tries to check out.
pub const CHECKOUT_NOTICE: &str = "Sorry! Checkout will be implemented in a future version.";

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub page: PageContext,
    pub cart: CartSummary,
}

/// Display the cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: ShopSession) -> Result<impl IntoResponse> {
    let cart = session.cart().await?;
    let summary = CartSummary::build(&cart, state.catalog())?;

    Ok(CartTemplate {
        page: session.page().await?,
        cart: summary,
    })
}

/// Add one melon to the cart and redirect to the cart page.
///
/// Unknown ids render the not-found page and leave the cart alone.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: ShopSession,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let melon = find_melon(&state, &id)?;

    let mut cart = session.cart().await?;
    let quantity = cart.add(melon.id.clone());
    session.set_cart(&cart).await?;

    tracing::info!(melon_id = %melon.id, quantity, "Added melon to cart");
    add_breadcrumb("cart", "Added melon to cart", &[("melon_id", melon.id.as_str())]);

    session
        .push_flash(Flash::success(format!(
            "You successfully added the {} to your cart!",
            melon.common_name
        )))
        .await?;

    Ok(Redirect::to("/cart"))
}

/// Checkout placeholder: flash a notice and go back to the catalog.
#[instrument(skip(session))]
pub async fn checkout(session: ShopSession) -> Result<Redirect> {
    session.push_flash(Flash::info(CHECKOUT_NOTICE)).await?;
    Ok(Redirect::to("/melons"))
}
