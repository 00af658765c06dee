//! Melon catalog records.

use ubermelon_core::{MelonId, Price};

/// A melon offered in the catalog.
///
/// Records are created once when the catalog is loaded and are never
/// mutated afterwards; per-request values such as quantities live on
/// [`CartLine`](super::CartLine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Melon {
    /// Catalog identifier, used in URLs and cart keys.
    pub id: MelonId,
    /// Botanical type, e.g. "Watermelon".
    pub melon_type: String,
    /// Name shown to shoppers, e.g. "Crenshaw".
    pub common_name: String,
    /// Unit price.
    pub price: Price,
    /// Optional product photo.
    pub image_url: Option<String>,
    /// Flesh color.
    pub color: String,
    /// Whether the melon is seedless.
    pub seedless: bool,
}

impl Melon {
    /// Path of the detail page for this melon.
    #[must_use]
    pub fn detail_path(&self) -> String {
        format!("/melon/{}", self.id)
    }

    /// Path that adds one of this melon to the cart.
    #[must_use]
    pub fn add_to_cart_path(&self) -> String {
        format!("/add_to_cart/{}", self.id)
    }
}
