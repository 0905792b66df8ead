use serde::{Deserialize, Serialize};

use crate::models::CartItem;

/// Totals computed over a frozen cart snapshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderTotals {
    pub price_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
}

/// Combine cart line items and a shipping cost into order totals.
///
/// Pure and deterministic. Prices and discounts are read verbatim from
/// the line items; `total = price - discount + shipping`.
pub fn calculate(items: &[CartItem], shipping_cost_cents: i64) -> OrderTotals {
    let price_cents: i64 = items.iter().map(|item| item.price_cents).sum();
    let discount_cents: i64 = items.iter().map(|item| item.discount_cents).sum();

    OrderTotals {
        price_cents,
        discount_cents,
        total_cents: price_cents - discount_cents + shipping_cost_cents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn item(price_cents: i64, discount_cents: i64) -> CartItem {
        CartItem {
            product_id: Uuid::new_v4(),
            category_name: "Books".to_string(),
            product_name: "Paperback".to_string(),
            quantity: 1,
            price_cents,
            discount_cents,
            image_path: None,
        }
    }

    #[test]
    fn test_totals_sum_items_and_add_shipping() {
        let items = vec![item(100, 10), item(50, 0)];

        let totals = calculate(&items, 20);

        assert_eq!(totals.price_cents, 150);
        assert_eq!(totals.discount_cents, 10);
        assert_eq!(totals.total_cents, 160);
    }

    #[test]
    fn test_totals_for_single_item() {
        let totals = calculate(&[item(2500, 500)], 300);

        assert_eq!(
            totals,
            OrderTotals {
                price_cents: 2500,
                discount_cents: 500,
                total_cents: 2300,
            }
        );
    }

    #[test]
    fn test_discount_can_cancel_out_price() {
        let totals = calculate(&[item(100, 100)], 40);

        assert_eq!(totals.total_cents, 40);
    }
}
