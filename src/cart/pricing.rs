//! Cart arithmetic. Amounts are whole pesos.

use serde::{Deserialize, Serialize};

use crate::domain::{CartLine, User};

pub const FREE_SHIPPING_THRESHOLD: u64 = 30_000;
pub const FLAT_SHIPPING_FEE: u64 = 3_990;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    pub flat_fee: u64,
    /// Subtotals at or above this ship for free.
    pub free_threshold: u64,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            flat_fee: FLAT_SHIPPING_FEE,
            free_threshold: FREE_SHIPPING_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CartTotals {
    pub units: u32,
    pub subtotal: u64,
    pub shipping: u64,
    pub discount: u64,
    pub total: u64,
}

pub fn calculate_subtotal(lines: &[CartLine]) -> u64 {
    lines.iter().map(CartLine::line_total).sum()
}

pub fn calculate_shipping(subtotal: u64, policy: &ShippingPolicy) -> u64 {
    if subtotal >= policy.free_threshold {
        0
    } else {
        policy.flat_fee
    }
}

/// True when the user carries a non-zero discount tag.
pub fn has_eligible_discount(user: &User) -> bool {
    user.discount.is_some_and(|d| !d.is_zero())
}

pub fn calculate_discount(subtotal: u64, user: &User) -> u64 {
    match user.discount {
        Some(discount) if !discount.is_zero() => {
            subtotal * u64::from(discount.as_percent()) / 100
        }
        _ => 0,
    }
}

/// `subtotal + shipping - discount`, floored at zero.
pub fn calculate_final_total(subtotal: u64, shipping: u64, discount: u64) -> u64 {
    subtotal.saturating_add(shipping).saturating_sub(discount)
}

/// Full breakdown for a cart. An empty cart costs nothing, shipping included.
pub fn summarize(lines: &[CartLine], user: Option<&User>, policy: &ShippingPolicy) -> CartTotals {
    if lines.is_empty() {
        return CartTotals::default();
    }
    let subtotal = calculate_subtotal(lines);
    let shipping = calculate_shipping(subtotal, policy);
    let discount = user.map_or(0, |u| calculate_discount(subtotal, u));
    CartTotals {
        units: lines.iter().map(|line| line.quantity).sum(),
        subtotal,
        shipping,
        discount,
        total: calculate_final_total(subtotal, shipping, discount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Discount;

    fn line(code: &str, quantity: u32, price: u64) -> CartLine {
        CartLine {
            product_code: code.into(),
            name: code.into(),
            quantity,
            price_at_add: price,
        }
    }

    fn user_with(discount: Option<&str>) -> User {
        let mut user = User::new("12345678", "Ana", "Rojas", "ana@duoc.cl");
        user.discount = discount.map(|d| d.parse::<Discount>().unwrap());
        user
    }

    #[test]
    fn test_subtotal_sums_quantity_times_price() {
        let lines = [line("A1", 2, 1000), line("B2", 1, 4500)];
        assert_eq!(calculate_subtotal(&lines), 6500);
        assert_eq!(calculate_subtotal(&[]), 0);
    }

    #[test]
    fn test_free_shipping_starts_exactly_at_threshold() {
        let policy = ShippingPolicy::default();
        assert_eq!(calculate_shipping(30_000, &policy), 0);
        assert_eq!(calculate_shipping(29_999, &policy), FLAT_SHIPPING_FEE);
        assert!(FLAT_SHIPPING_FEE > 0);
    }

    #[test]
    fn test_discount_applies_the_stored_percentage() {
        let user = user_with(Some("20%"));
        assert!(has_eligible_discount(&user));
        assert_eq!(calculate_discount(10_000, &user), 2_000);
        assert_eq!(calculate_final_total(10_000, 0, 2_000), 8_000);
    }

    #[test]
    fn test_zero_or_missing_tag_grants_nothing() {
        for user in [user_with(Some("0%")), user_with(None)] {
            assert!(!has_eligible_discount(&user));
            assert_eq!(calculate_discount(10_000, &user), 0);
        }
    }

    #[test]
    fn test_final_total_never_goes_negative() {
        assert_eq!(calculate_final_total(100, 0, 500), 0);
    }

    #[test]
    fn test_summary_of_checkout_cart() {
        let lines = [line("A1", 2, 1000)];
        let totals = summarize(&lines, Some(&user_with(None)), &ShippingPolicy::default());
        assert_eq!(
            totals,
            CartTotals {
                units: 2,
                subtotal: 2000,
                shipping: FLAT_SHIPPING_FEE,
                discount: 0,
                total: 2000 + FLAT_SHIPPING_FEE,
            }
        );
        assert_eq!(summarize(&[], None, &ShippingPolicy::default()), CartTotals::default());
    }
}
