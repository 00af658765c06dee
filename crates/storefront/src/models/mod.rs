//! Domain models for the storefront.
//!
//! - [`melon`] - Catalog records
//! - [`customer`] - Customer directory entries and the session identity
//! - [`cart`] - Session cart and the per-request cart summary
//! - [`flash`] - One-shot notices
//! - [`session`] - Typed access to the visitor session

pub mod cart;
pub mod customer;
pub mod flash;
pub mod melon;
pub mod session;

pub use cart::{Cart, CartLine, CartSummary};
pub use customer::{CurrentCustomer, Customer};
pub use flash::{Flash, FlashLevel};
pub use melon::Melon;
pub use session::{PageContext, ShopSession, session_keys};
