use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Order, OrderStatus};
use crate::notification::{NotificationGateway, NotifyError};
use crate::pricing;
use crate::repository::{
    AddressDirectory, CartRepository, OrderRepository, ShippingCostResolver, StoreError,
};
use crate::settlement::PaymentConfirmation;

/// Failure taxonomy for the order lifecycle operations
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("confirmation delivery failed")]
    NotificationFailure(#[source] NotifyError),

    #[error("storage failure")]
    Internal(#[source] StoreError),
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateOrder(user_id) => {
                OrderError::Conflict(format!("open order already exists for user {user_id}"))
            }
            other => OrderError::Internal(other),
        }
    }
}

/// Input for [`OrderOrchestrator::create_order`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub address_id: Uuid,
    pub customer_name: String,
    pub phone_number: String,
    pub email: String,
    pub note: Option<String>,
}

/// Coordinates address lookup, shipping-cost resolution, the live cart,
/// and order storage into the three public lifecycle operations
///
/// Every collaborator is injected as a trait object at construction;
/// the orchestrator holds no other state.
pub struct OrderOrchestrator {
    addresses: Arc<dyn AddressDirectory>,
    shipping: Arc<dyn ShippingCostResolver>,
    carts: Arc<dyn CartRepository>,
    orders: Arc<dyn OrderRepository>,
    notifier: Arc<dyn NotificationGateway>,
}

impl OrderOrchestrator {
    pub fn new(
        addresses: Arc<dyn AddressDirectory>,
        shipping: Arc<dyn ShippingCostResolver>,
        carts: Arc<dyn CartRepository>,
        orders: Arc<dyn OrderRepository>,
        notifier: Arc<dyn NotificationGateway>,
    ) -> Self {
        Self {
            addresses,
            shipping,
            carts,
            orders,
            notifier,
        }
    }

    /// Turn the user's cart into a priced, pending order.
    ///
    /// The live cart is left untouched; it is released at settlement
    /// time, not here.
    pub async fn create_order(&self, req: NewOrder) -> Result<Order, OrderError> {
        if req.user_id.is_nil() || req.address_id.is_nil() {
            return Err(OrderError::InvalidRequest(
                "user id and address id are required".to_string(),
            ));
        }
        if req.email.trim().is_empty() {
            return Err(OrderError::InvalidRequest(
                "customer email is required".to_string(),
            ));
        }

        if self.orders.find_by_user(req.user_id).await?.is_some() {
            return Err(OrderError::Conflict(format!(
                "open order already exists for user {}",
                req.user_id
            )));
        }

        let address = self
            .addresses
            .address_by_id(req.address_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("address {}", req.address_id)))?;

        let shipping = self
            .shipping
            .cost_for_province(&address.province_code)
            .await?
            .ok_or_else(|| {
                OrderError::NotFound(format!(
                    "shipping cost for province {}",
                    address.province_code
                ))
            })?;

        let items = self.carts.items_for_user(req.user_id).await?;
        if items.is_empty() {
            return Err(OrderError::NotFound(format!("cart for user {}", req.user_id)));
        }

        let totals = pricing::calculate(&items, shipping.cost_cents);

        let order = Order {
            id: Uuid::new_v4(),
            user_id: req.user_id,
            address_id: address.id,
            shipping_cost_id: shipping.id,
            shipping_cost_cents: shipping.cost_cents,
            price_cents: totals.price_cents,
            discount_cents: totals.discount_cents,
            total_cents: totals.total_cents,
            order_date: Utc::now(),
            status: OrderStatus::Pending,
            shipping_address: address.formatted(),
            customer_name: req.customer_name,
            phone_number: req.phone_number,
            email: req.email,
            note: req.note,
            items,
        };

        // The insert is the authoritative uniqueness check; the lookup
        // above only gives the fast answer for the common case.
        self.orders.insert(&order).await?;

        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            total_cents = order.total_cents,
            "order created"
        );
        Ok(order)
    }

    /// Remove a pending order, guarded by the owner's live cart being
    /// empty.
    pub async fn delete_order(&self, order_id: Uuid) -> Result<(), OrderError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("order {order_id}")))?;

        let cart = self.carts.items_for_user(order.user_id).await?;
        if !cart.is_empty() {
            return Err(OrderError::PreconditionFailed(format!(
                "cart for user {} still holds {} item(s)",
                order.user_id,
                cart.len()
            )));
        }

        self.orders.delete(order.id).await?;

        tracing::info!(order_id = %order.id, user_id = %order.user_id, "order deleted");
        Ok(())
    }

    /// Settle an order: confirm to the customer, release the live cart,
    /// retire the order record.
    ///
    /// Delivery is attempted before either mutation; a delivery failure
    /// leaves the order and cart exactly as they were.
    pub async fn process_payment(
        &self,
        order_id: Uuid,
    ) -> Result<PaymentConfirmation, OrderError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("order {order_id}")))?;

        let confirmation = PaymentConfirmation::from_order(&order);
        let message = confirmation.to_message();

        if let Err(err) = self.notifier.deliver(&message).await {
            tracing::warn!(
                order_id = %order.id,
                error = %err,
                "confirmation delivery failed; order left intact"
            );
            return Err(OrderError::NotificationFailure(err));
        }

        // Past this point the confirmation is already with the customer.
        // A storage failure leaves an open order behind a sent email,
        // and a retry would notify a second time.
        if let Err(err) = self.carts.clear_for_user(order.user_id).await {
            tracing::error!(
                order_id = %order.id,
                user_id = %order.user_id,
                error = %err,
                "reconcile: confirmation sent but cart clear failed"
            );
            return Err(err.into());
        }

        if let Err(err) = self.orders.delete(order.id).await {
            tracing::error!(
                order_id = %order.id,
                user_id = %order.user_id,
                error = %err,
                "reconcile: confirmation sent and cart cleared but order delete failed"
            );
            return Err(err.into());
        }

        tracing::info!(order_id = %order.id, user_id = %order.user_id, "payment settled");
        Ok(confirmation)
    }
}
