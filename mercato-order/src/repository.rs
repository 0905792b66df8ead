use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Address, CartItem, Order, ShippingCost};

/// Storage-layer failure surfaced to the orchestration layer
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store already holds an open order for this user.
    #[error("open order already exists for user {0}")]
    DuplicateOrder(Uuid),

    #[error("storage backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        StoreError::Backend(err.into())
    }
}

/// Lookup of delivery-address reference records
#[async_trait]
pub trait AddressDirectory: Send + Sync {
    async fn address_by_id(&self, id: Uuid) -> Result<Option<Address>, StoreError>;
}

/// Lookup of the cost to ship to a province
#[async_trait]
pub trait ShippingCostResolver: Send + Sync {
    async fn cost_for_province(&self, province_code: &str)
        -> Result<Option<ShippingCost>, StoreError>;
}

/// Access to a user's live cart
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Current line items for the user; empty when there is no cart.
    async fn items_for_user(&self, user_id: Uuid) -> Result<Vec<CartItem>, StoreError>;

    /// Remove every line item for the user. Clearing an already-empty
    /// cart is not an error.
    async fn clear_for_user(&self, user_id: Uuid) -> Result<(), StoreError>;
}

/// Persistence for order aggregates
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order. The store is the authority on the
    /// one-open-order-per-user rule and rejects a second order with
    /// [`StoreError::DuplicateOrder`].
    async fn insert(&self, order: &Order) -> Result<(), StoreError>;

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Order>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError>;

    /// Remove the order permanently. No soft-delete state is retained.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}
