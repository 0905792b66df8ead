use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order status in the lifecycle
///
/// The core workflow only ever produces `Pending`; a pending order is
/// retired by deletion (explicit or at settlement), not by transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(OrderStatus::Pending),
            "PAID" => Some(OrderStatus::Paid),
            "CANCELLED" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

/// Immutable delivery-address reference record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub id: Uuid,
    pub province_code: String,
    pub province_name: String,
    pub district_name: String,
    pub ward_name: String,
    pub street_address: String,
}

impl Address {
    /// Render the address as the single shipping line embedded into orders
    pub fn formatted(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.province_name, self.district_name, self.ward_name, self.street_address
        )
    }
}

/// Cost to ship to a province, keyed by province code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingCost {
    pub id: Uuid,
    pub province_code: String,
    pub cost_cents: i64,
}

/// A line item in a user's cart
///
/// Mutable while it lives in the cart; a frozen copy once embedded into
/// an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: Uuid,
    pub category_name: String,
    pub product_name: String,
    pub quantity: u32,
    pub price_cents: i64,
    pub discount_cents: i64,
    pub image_path: Option<String>,
}

/// The central aggregate: a priced, pending order with its frozen cart
/// snapshot
///
/// `shipping_cost_cents` and `shipping_address` are copies taken at
/// creation time; later changes to the shipping-cost table or address
/// record do not alter existing orders. `total_cents` is computed once
/// at creation and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address_id: Uuid,
    pub shipping_cost_id: Uuid,
    pub shipping_cost_cents: i64,
    pub price_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub customer_name: String,
    pub phone_number: String,
    pub email: String,
    pub note: Option<String>,
    pub items: Vec<CartItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_formatting() {
        let address = Address {
            id: Uuid::new_v4(),
            province_code: "79".to_string(),
            province_name: "Ho Chi Minh".to_string(),
            district_name: "District 1".to_string(),
            ward_name: "Ben Nghe".to_string(),
            street_address: "12 Le Loi".to_string(),
        };

        assert_eq!(address.formatted(), "Ho Chi Minh, District 1, Ben Nghe 12 Le Loi");
    }

    #[test]
    fn test_status_round_trip() {
        for status in [OrderStatus::Pending, OrderStatus::Paid, OrderStatus::Cancelled] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("SHIPPED"), None);
    }
}
