use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Address, CartItem, Order, ShippingCost};
use crate::repository::{
    AddressDirectory, CartRepository, OrderRepository, ShippingCostResolver, StoreError,
};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory address directory
#[derive(Default)]
pub struct MemoryAddressDirectory {
    addresses: RwLock<HashMap<Uuid, Address>>,
}

impl MemoryAddressDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, address: Address) {
        write(&self.addresses).insert(address.id, address);
    }
}

#[async_trait]
impl AddressDirectory for MemoryAddressDirectory {
    async fn address_by_id(&self, id: Uuid) -> Result<Option<Address>, StoreError> {
        Ok(read(&self.addresses).get(&id).cloned())
    }
}

/// In-memory shipping-cost table keyed by province code
#[derive(Default)]
pub struct MemoryShippingCostResolver {
    costs: RwLock<HashMap<String, ShippingCost>>,
}

impl MemoryShippingCostResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, cost: ShippingCost) {
        write(&self.costs).insert(cost.province_code.clone(), cost);
    }
}

#[async_trait]
impl ShippingCostResolver for MemoryShippingCostResolver {
    async fn cost_for_province(
        &self,
        province_code: &str,
    ) -> Result<Option<ShippingCost>, StoreError> {
        Ok(read(&self.costs).get(province_code).cloned())
    }
}

/// In-memory live carts keyed by user
#[derive(Default)]
pub struct MemoryCartRepository {
    carts: RwLock<HashMap<Uuid, Vec<CartItem>>>,
}

impl MemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_items(&self, user_id: Uuid, items: Vec<CartItem>) {
        write(&self.carts).insert(user_id, items);
    }
}

#[async_trait]
impl CartRepository for MemoryCartRepository {
    async fn items_for_user(&self, user_id: Uuid) -> Result<Vec<CartItem>, StoreError> {
        Ok(read(&self.carts).get(&user_id).cloned().unwrap_or_default())
    }

    async fn clear_for_user(&self, user_id: Uuid) -> Result<(), StoreError> {
        write(&self.carts).remove(&user_id);
        Ok(())
    }
}

/// In-memory order store
///
/// The one-open-order-per-user rule is checked inside the write lock,
/// so concurrent inserts for the same user cannot both succeed.
#[derive(Default)]
pub struct MemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        read(&self.orders).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.orders).is_empty()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn insert(&self, order: &Order) -> Result<(), StoreError> {
        let mut orders = write(&self.orders);
        if orders.values().any(|existing| existing.user_id == order.user_id) {
            return Err(StoreError::DuplicateOrder(order.user_id));
        }
        orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(read(&self.orders)
            .values()
            .find(|order| order.user_id == user_id)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(read(&self.orders).get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        write(&self.orders).remove(&id);
        Ok(())
    }
}
