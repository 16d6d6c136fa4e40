use chrono::{DateTime, Utc};

use crate::domain::{CartLine, Order, OrderLine, ShippingStatus, User};

/// Timestamp-based order number, e.g. `ORD-1760659200000`.
pub fn generate_order_number(at: DateTime<Utc>) -> String {
    format!("ORD-{}", at.timestamp_millis())
}

/// Builds an order from the cart. Pure construction: nothing is persisted.
///
/// Lines are copied into [`OrderLine`] snapshots so later product edits never
/// alter historical orders.
pub fn create_order(
    user: &User,
    cart_lines: &[CartLine],
    final_total: u64,
    discount_code: Option<String>,
    payment_ref: Option<String>,
) -> Order {
    create_order_at(Utc::now(), user, cart_lines, final_total, discount_code, payment_ref)
}

pub fn create_order_at(
    at: DateTime<Utc>,
    user: &User,
    cart_lines: &[CartLine],
    final_total: u64,
    discount_code: Option<String>,
    payment_ref: Option<String>,
) -> Order {
    let line_items = cart_lines
        .iter()
        .map(|line| OrderLine {
            product_code: line.product_code.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: line.price_at_add,
        })
        .collect();

    let address = &user.address;
    let shipping_address = (!address.street.is_empty()
        || !address.commune.is_empty()
        || !address.region.is_empty())
    .then(|| address.clone());

    Order {
        order_number: generate_order_number(at),
        user_run: user.run.clone(),
        date: at,
        line_items,
        total: final_total,
        shipping_status: ShippingStatus::Pending,
        shipping_address,
        discount_code,
        payment_ref,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Address;
    use chrono::TimeZone;

    #[test]
    fn test_order_snapshots_lines_and_user() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let mut user = User::new("12345678", "Ana", "Rojas", "ana@duoc.cl");
        user.address = Address {
            street: "Av. Siempre Viva 742".into(),
            commune: "Providencia".into(),
            region: "Metropolitana".into(),
        };
        let mut lines = vec![CartLine {
            product_code: "A1".into(),
            name: "Pelota".into(),
            quantity: 2,
            price_at_add: 1000,
        }];

        let order = create_order_at(at, &user, &lines, 5990, None, Some("PAY-1".into()));
        lines[0].quantity = 9;

        assert_eq!(order.order_number, format!("ORD-{}", at.timestamp_millis()));
        assert_eq!(order.user_run, "12345678");
        assert_eq!(order.line_items[0].quantity, 2);
        assert_eq!(order.subtotal(), 2000);
        assert_eq!(order.total, 5990);
        assert_eq!(order.shipping_status, ShippingStatus::Pending);
        assert_eq!(order.shipping_address, Some(user.address.clone()));
        assert_eq!(order.payment_ref.as_deref(), Some("PAY-1"));
    }

    #[test]
    fn test_empty_address_is_not_recorded() {
        let user = User::new("1234567", "Ana", "Rojas", "ana@gmail.com");
        let order = create_order(&user, &[], 0, None, None);
        assert_eq!(order.shipping_address, None);
        assert!(order.line_items.is_empty());
    }
}
