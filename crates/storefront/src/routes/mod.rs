//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check (see lib.rs)
//!
//! # Catalog
//! GET  /melons                 - Melon listing
//! GET  /melon/{id}             - Melon detail
//!
//! # Cart
//! GET  /cart                   - Cart page
//! GET  /add_to_cart/{id}       - Add one melon, redirect to /cart
//! GET  /checkout               - Not implemented yet; flash and redirect
//! POST /checkout               - Same as GET
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! POST /logout                 - Logout action
//! ```

pub mod auth;
pub mod cart;
pub mod home;
pub mod melons;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .route("/melons", get(melons::index))
        .route("/melon/{id}", get(melons::show))
        // Cart
        .route("/cart", get(cart::show))
        .route("/add_to_cart/{id}", get(cart::add))
        .route("/checkout", get(cart::checkout).post(cart::checkout))
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}
