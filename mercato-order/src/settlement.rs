use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Order, OrderStatus};
use crate::notification::ConfirmationMessage;

/// Presentation form of a settled order: returned to the caller and
/// rendered into the customer confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub order_id: Uuid,
    pub total_cents: i64,
    pub shipping_address: String,
    pub customer_name: String,
    pub phone_number: String,
    pub email: String,
    pub note: Option<String>,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub items: Vec<ConfirmationItem>,
}

/// A frozen cart line reshaped for presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationItem {
    pub product_id: Uuid,
    pub category_name: String,
    pub product_name: String,
    pub quantity: u32,
    pub price_cents: i64,
    pub discount_cents: i64,
    pub image_path: Option<String>,
}

impl PaymentConfirmation {
    /// Reshape an order into its settlement view
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id,
            total_cents: order.total_cents,
            shipping_address: order.shipping_address.clone(),
            customer_name: order.customer_name.clone(),
            phone_number: order.phone_number.clone(),
            email: order.email.clone(),
            note: order.note.clone(),
            order_date: order.order_date,
            status: order.status.clone(),
            items: order
                .items
                .iter()
                .map(|item| ConfirmationItem {
                    product_id: item.product_id,
                    category_name: item.category_name.clone(),
                    product_name: item.product_name.clone(),
                    quantity: item.quantity,
                    price_cents: item.price_cents,
                    discount_cents: item.discount_cents,
                    image_path: item.image_path.clone(),
                })
                .collect(),
        }
    }

    /// Render the confirmation into a deliverable message addressed to
    /// the order's customer email
    pub fn to_message(&self) -> ConfirmationMessage {
        let mut body = String::new();
        body.push_str(&format!("Hi {},\n\n", self.customer_name));
        body.push_str(&format!(
            "Your order {} placed on {} has been paid.\n",
            self.order_id,
            self.order_date.format("%Y-%m-%d %H:%M UTC")
        ));
        body.push_str(&format!("Ship to: {}\n\n", self.shipping_address));

        for item in &self.items {
            body.push_str(&format!(
                "  {} ({}) x{} - {}\n",
                item.product_name,
                item.category_name,
                item.quantity,
                format_cents(item.price_cents - item.discount_cents)
            ));
        }

        body.push_str(&format!("\nTotal charged: {}\n", format_cents(self.total_cents)));
        if let Some(note) = &self.note {
            body.push_str(&format!("Note: {}\n", note));
        }

        ConfirmationMessage {
            recipient: self.email.clone(),
            subject: "Order Confirmation".to_string(),
            body,
        }
    }
}

fn format_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CartItem;

    fn order() -> Order {
        Order {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            address_id: Uuid::new_v4(),
            shipping_cost_id: Uuid::new_v4(),
            shipping_cost_cents: 2000,
            price_cents: 15000,
            discount_cents: 1000,
            total_cents: 16000,
            order_date: Utc::now(),
            status: OrderStatus::Pending,
            shipping_address: "Ho Chi Minh, District 1, Ben Nghe 12 Le Loi".to_string(),
            customer_name: "Lan Tran".to_string(),
            phone_number: "+84 90 000 0000".to_string(),
            email: "lan@example.com".to_string(),
            note: Some("Leave at the front desk".to_string()),
            items: vec![CartItem {
                product_id: Uuid::new_v4(),
                category_name: "Books".to_string(),
                product_name: "Paperback".to_string(),
                quantity: 2,
                price_cents: 15000,
                discount_cents: 1000,
                image_path: None,
            }],
        }
    }

    #[test]
    fn test_view_copies_order_fields() {
        let order = order();

        let view = PaymentConfirmation::from_order(&order);

        assert_eq!(view.order_id, order.id);
        assert_eq!(view.total_cents, 16000);
        assert_eq!(view.shipping_address, order.shipping_address);
        assert_eq!(view.status, OrderStatus::Pending);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].product_name, "Paperback");
    }

    #[test]
    fn test_message_is_addressed_to_customer() {
        let view = PaymentConfirmation::from_order(&order());

        let message = view.to_message();

        assert_eq!(message.recipient, "lan@example.com");
        assert_eq!(message.subject, "Order Confirmation");
        assert!(message.body.contains("Paperback"));
        assert!(message.body.contains("Total charged: 160.00"));
        assert!(message.body.contains("Leave at the front desk"));
    }

    #[test]
    fn test_view_serializes_with_screaming_status() {
        let view = PaymentConfirmation::from_order(&order());

        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["status"], "PENDING");
        assert_eq!(value["total_cents"], 16000);
    }

    #[test]
    fn test_cents_formatting() {
        assert_eq!(format_cents(160), "1.60");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(16000), "160.00");
    }
}
