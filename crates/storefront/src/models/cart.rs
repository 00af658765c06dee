//! Session cart and the per-request cart summary.
//!
//! The [`Cart`] is what lives in the session: melon ids and quantities, nothing
//! else. Prices and names are resolved against the catalog each time the cart
//! page renders, producing a [`CartSummary`] of request-scoped [`CartLine`]s.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ubermelon_core::{MelonId, Price, PriceError};

use super::Melon;
use crate::store::Catalog;

/// Melon id to quantity mapping owned by a visitor session.
///
/// Iterates in melon id order so the cart page is stable between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: BTreeMap<MelonId, u32>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a melon and return its new quantity.
    pub fn add(&mut self, id: MelonId) -> u32 {
        let quantity = self.items.entry(id).or_insert(0);
        *quantity = quantity.saturating_add(1);
        *quantity
    }

    /// Quantity of a melon, zero if absent.
    #[must_use]
    pub fn quantity(&self, id: &MelonId) -> u32 {
        self.items.get(id).copied().unwrap_or(0)
    }

    /// Number of units across all melons.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .values()
            .fold(0u32, |acc, quantity| acc.saturating_add(*quantity))
    }

    /// Number of distinct melons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over `(melon id, quantity)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&MelonId, u32)> {
        self.items.iter().map(|(id, quantity)| (id, *quantity))
    }
}

/// One melon in the cart, priced for display.
///
/// Holds its own copy of the catalog record so per-request values never
/// touch the shared catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub melon: Melon,
    pub quantity: u32,
    /// `melon.price * quantity`
    pub line_total: Price,
}

/// The cart resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    /// Sum of all line totals.
    pub total: Price,
    /// Units across all lines.
    pub item_count: u32,
}

impl CartSummary {
    /// Price every line of `cart` using `catalog`.
    ///
    /// Ids that no longer resolve in the catalog are skipped with a warning
    /// rather than failing the whole page.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if a line total or the grand total does
    /// not fit in a decimal.
    pub fn build(cart: &Cart, catalog: &Catalog) -> Result<Self, PriceError> {
        let mut lines = Vec::with_capacity(cart.len());
        let mut total = Price::zero(catalog.currency());
        let mut item_count = 0u32;

        for (id, quantity) in cart.iter() {
            let Some(melon) = catalog.get_by_id(id) else {
                tracing::warn!(melon_id = %id, "Cart references unknown melon, skipping line");
                continue;
            };

            let line_total = melon.price.checked_mul(quantity)?;
            total = total.checked_add(line_total)?;
            item_count = item_count.saturating_add(quantity);

            lines.push(CartLine {
                melon: melon.clone(),
                quantity,
                line_total,
            });
        }

        Ok(Self {
            lines,
            total,
            item_count,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use ubermelon_core::CurrencyCode;

    use super::*;

    fn id(s: &str) -> MelonId {
        MelonId::parse(s).unwrap()
    }

    fn melon(code: &str, cents: u32) -> Melon {
        Melon {
            id: id(code),
            melon_type: "Test".to_string(),
            common_name: format!("Test {code}"),
            price: Price::from_cents(cents, CurrencyCode::USD),
            image_url: None,
            color: "green".to_string(),
            seedless: false,
        }
    }

    #[test]
    fn test_add_increments_instead_of_overwriting() {
        let mut cart = Cart::new();
        for expected in 1..=5 {
            assert_eq!(cart.add(id("cran")), expected);
        }
        assert_eq!(cart.quantity(&id("cran")), 5);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_quantity_of_absent_melon_is_zero() {
        let cart = Cart::new();
        assert_eq!(cart.quantity(&id("cran")), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_session_json_shape() {
        let mut cart = Cart::new();
        cart.add(id("cran"));
        cart.add(id("cran"));
        cart.add(id("apok"));

        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(json, r#"{"apok":1,"cran":2}"#);

        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_cart_rejects_invalid_ids_from_session() {
        let result: Result<Cart, _> = serde_json::from_str(r#"{"../etc":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_summary_of_empty_cart() {
        let catalog = Catalog::builtin();
        let summary = CartSummary::build(&Cart::new(), &catalog).unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.total.amount(), Decimal::ZERO);
        assert_eq!(summary.item_count, 0);
    }

    #[test]
    fn test_summary_single_line() {
        let catalog = Catalog::new(vec![melon("cran", 900)]).unwrap();
        let mut cart = Cart::new();
        cart.add(id("cran"));
        cart.add(id("cran"));

        let summary = CartSummary::build(&cart, &catalog).unwrap();
        assert_eq!(summary.lines.len(), 1);
        let line = summary.lines.first().unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.line_total.to_string(), "$18.00");
        assert_eq!(summary.total.to_string(), "$18.00");
    }

    #[test]
    fn test_summary_total_is_sum_of_lines() {
        let catalog = Catalog::new(vec![
            melon("apok", 250),
            melon("cran", 900),
            melon("mush", 475),
        ])
        .unwrap();
        let mut cart = Cart::new();
        for _ in 0..3 {
            cart.add(id("apok"));
        }
        cart.add(id("cran"));
        for _ in 0..2 {
            cart.add(id("mush"));
        }

        let summary = CartSummary::build(&cart, &catalog).unwrap();
        let expected: Decimal = summary
            .lines
            .iter()
            .map(|line| line.melon.price.amount() * Decimal::from(line.quantity))
            .sum();
        assert_eq!(summary.total.amount(), expected);
        assert_eq!(summary.total.amount(), Decimal::new(2600, 2));
        assert_eq!(summary.item_count, 6);
    }

    #[test]
    fn test_summary_skips_unknown_melons() {
        let catalog = Catalog::new(vec![melon("cran", 900)]).unwrap();
        let mut cart = Cart::new();
        cart.add(id("cran"));
        cart.add(id("gone"));

        let summary = CartSummary::build(&cart, &catalog).unwrap();
        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.total.to_string(), "$9.00");
    }

    #[test]
    fn test_summary_does_not_touch_catalog() {
        let catalog = Catalog::new(vec![melon("cran", 900)]).unwrap();
        let before = catalog.get_by_id(&id("cran")).cloned();
        let mut cart = Cart::new();
        cart.add(id("cran"));
        cart.add(id("cran"));

        let _ = CartSummary::build(&cart, &catalog).unwrap();
        assert_eq!(catalog.get_by_id(&id("cran")).cloned(), before);
    }
}
