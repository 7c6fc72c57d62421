//! Shopping cart.
//!
//! Lines are keyed by product id. Adding a product already in the cart bumps
//! its quantity; removing drops the whole line.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storedesk_core::{CurrencyCode, Price, ProductId};

use crate::api::types::Product;

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    currency_code: CurrencyCode,
    lines: Vec<CartLine>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(CurrencyCode::default())
    }
}

impl Cart {
    #[must_use]
    pub const fn new(currency_code: CurrencyCode) -> Self {
        Self {
            currency_code,
            lines: Vec::new(),
        }
    }

    /// Add one unit of a product.
    pub fn add(&mut self, product: &Product) {
        self.add_line(&product.id, &product.name, product.price);
    }

    /// Add one unit of a product described by its parts.
    pub fn add_line(&mut self, product_id: &ProductId, name: &str, unit_price: Decimal) {
        if let Some(line) = self.lines.iter_mut().find(|l| &l.product_id == product_id) {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }
        self.lines.push(CartLine {
            product_id: product_id.clone(),
            name: name.to_string(),
            unit_price,
            quantity: 1,
        });
    }

    /// Remove a product's line. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| &l.product_id != product_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products (the badge count).
    #[must_use]
    pub fn count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of price × quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        let amount = self.lines.iter().map(CartLine::line_total).sum();
        Price::new(amount, self.currency_code)
    }

    #[must_use]
    pub const fn currency_code(&self) -> CurrencyCode {
        self.currency_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::from(price),
            description: String::new(),
            image: None,
            category: None,
            stockcount: vec![],
        }
    }

    #[test]
    fn test_repeat_add_increments_quantity() {
        let mut cart = Cart::default();
        let p1 = product("p1", 100);
        cart.add(&p1);
        cart.add(&p1);

        assert_eq!(cart.count(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.total().amount, Decimal::from(200));
    }

    #[test]
    fn test_remove_drops_whole_line() {
        let mut cart = Cart::default();
        cart.add(&product("p1", 100));
        cart.add(&product("p1", 100));
        cart.add(&product("p2", 5));

        assert!(cart.remove(&ProductId::new("p1")));
        assert!(!cart.remove(&ProductId::new("missing")));
        assert_eq!(cart.count(), 1);
        assert_eq!(cart.total().amount, Decimal::from(5));
    }

    #[test]
    fn test_total_matches_lines_for_any_sequence() {
        // Deterministic pseudo-random walk over add/remove operations.
        let products: Vec<_> = (0..5).map(|i| product(&format!("p{i}"), 10 * i + 3)).collect();
        let mut cart = Cart::default();
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;

        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let idx = usize::try_from(seed % 5).unwrap_or(0);
            if seed % 3 == 0 {
                cart.remove(&products[idx].id);
            } else {
                cart.add(&products[idx]);
            }

            let expected: Decimal = cart
                .lines()
                .iter()
                .map(|l| l.unit_price * Decimal::from(l.quantity))
                .sum();
            assert_eq!(cart.total().amount, expected);
            assert!(cart.lines().iter().all(|l| l.quantity >= 1));
        }
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::default();
        cart.add(&product("p1", 1));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total().amount, Decimal::ZERO);
    }

    #[test]
    fn test_serde_roundtrip_for_storage() {
        let mut cart = Cart::new(CurrencyCode::INR);
        cart.add(&product("p1", 250));
        let raw = serde_json::to_string(&cart).unwrap_or_default();
        let restored: Cart = serde_json::from_str(&raw).unwrap_or_default();
        assert_eq!(restored, cart);
    }
}
