use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use mercato_order::models::{Address, CartItem, Order, OrderStatus, ShippingCost};
use mercato_order::repository::{
    AddressDirectory, CartRepository, OrderRepository, ShippingCostResolver, StoreError,
};

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::backend(err)
}

// Row structs for type-safe querying

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: Uuid,
    province_code: String,
    province_name: String,
    district_name: String,
    ward_name: String,
    street_address: String,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Address {
            id: row.id,
            province_code: row.province_code,
            province_name: row.province_name,
            district_name: row.district_name,
            ward_name: row.ward_name,
            street_address: row.street_address,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ShippingCostRow {
    id: Uuid,
    province_code: String,
    cost_cents: i64,
}

impl From<ShippingCostRow> for ShippingCost {
    fn from(row: ShippingCostRow) -> Self {
        ShippingCost {
            id: row.id,
            province_code: row.province_code,
            cost_cents: row.cost_cents,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartItemRow {
    product_id: Uuid,
    category_name: String,
    product_name: String,
    quantity: i32,
    price_cents: i64,
    discount_cents: i64,
    image_path: Option<String>,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        CartItem {
            product_id: row.product_id,
            category_name: row.category_name,
            product_name: row.product_name,
            quantity: row.quantity.max(0) as u32,
            price_cents: row.price_cents,
            discount_cents: row.discount_cents,
            image_path: row.image_path,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    address_id: Uuid,
    shipping_cost_id: Uuid,
    shipping_cost_cents: i64,
    price_cents: i64,
    discount_cents: i64,
    total_cents: i64,
    order_date: DateTime<Utc>,
    status: String,
    shipping_address: String,
    customer_name: String,
    phone_number: String,
    email: String,
    note: Option<String>,
}

pub struct PgAddressDirectory {
    pool: PgPool,
}

impl PgAddressDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressDirectory for PgAddressDirectory {
    async fn address_by_id(&self, id: Uuid) -> Result<Option<Address>, StoreError> {
        let row = sqlx::query_as::<_, AddressRow>(
            "SELECT id, province_code, province_name, district_name, ward_name, street_address \
             FROM addresses WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(Address::from))
    }
}

pub struct PgShippingCostResolver {
    pool: PgPool,
}

impl PgShippingCostResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShippingCostResolver for PgShippingCostResolver {
    async fn cost_for_province(
        &self,
        province_code: &str,
    ) -> Result<Option<ShippingCost>, StoreError> {
        let row = sqlx::query_as::<_, ShippingCostRow>(
            "SELECT id, province_code, cost_cents FROM shipping_costs WHERE province_code = $1",
        )
        .bind(province_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(ShippingCost::from))
    }
}

pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn items_for_user(&self, user_id: Uuid) -> Result<Vec<CartItem>, StoreError> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            "SELECT product_id, category_name, product_name, quantity, price_cents, \
             discount_cents, image_path FROM cart_items WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows.into_iter().map(CartItem::from).collect())
    }

    async fn clear_for_user(&self, user_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn assemble(&self, row: OrderRow) -> Result<Order, StoreError> {
        let items = sqlx::query_as::<_, CartItemRow>(
            "SELECT product_id, category_name, product_name, quantity, price_cents, \
             discount_cents, image_path FROM order_items WHERE order_id = $1",
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        let status = OrderStatus::parse(&row.status)
            .ok_or_else(|| StoreError::backend(format!("unknown order status {}", row.status)))?;

        Ok(Order {
            id: row.id,
            user_id: row.user_id,
            address_id: row.address_id,
            shipping_cost_id: row.shipping_cost_id,
            shipping_cost_cents: row.shipping_cost_cents,
            price_cents: row.price_cents,
            discount_cents: row.discount_cents,
            total_cents: row.total_cents,
            order_date: row.order_date,
            status,
            shipping_address: row.shipping_address,
            customer_name: row.customer_name,
            phone_number: row.phone_number,
            email: row.email,
            note: row.note,
            items: items.into_iter().map(CartItem::from).collect(),
        })
    }
}

const SELECT_ORDER: &str = "SELECT id, user_id, address_id, shipping_cost_id, \
    shipping_cost_cents, price_cents, discount_cents, total_cents, order_date, status, \
    shipping_address, customer_name, phone_number, email, note FROM orders";

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn insert(&self, order: &Order) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        let inserted = sqlx::query(
            "INSERT INTO orders (id, user_id, address_id, shipping_cost_id, \
             shipping_cost_cents, price_cents, discount_cents, total_cents, order_date, \
             status, shipping_address, customer_name, phone_number, email, note) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(order.id)
        .bind(order.user_id)
        .bind(order.address_id)
        .bind(order.shipping_cost_id)
        .bind(order.shipping_cost_cents)
        .bind(order.price_cents)
        .bind(order.discount_cents)
        .bind(order.total_cents)
        .bind(order.order_date)
        .bind(order.status.as_str())
        .bind(&order.shipping_address)
        .bind(&order.customer_name)
        .bind(&order.phone_number)
        .bind(&order.email)
        .bind(order.note.as_deref())
        .execute(&mut *tx)
        .await;

        if let Err(err) = inserted {
            // The unique index on orders(user_id) is the authority on
            // the one-open-order-per-user rule.
            if let sqlx::Error::Database(db_err) = &err {
                if db_err.is_unique_violation() {
                    return Err(StoreError::DuplicateOrder(order.user_id));
                }
            }
            return Err(backend(err));
        }

        for item in &order.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, category_name, product_name, \
                 quantity, price_cents, discount_cents, image_path) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(&item.category_name)
            .bind(&item.product_name)
            .bind(item.quantity as i32)
            .bind(item.price_cents)
            .bind(item.discount_cents)
            .bind(item.image_path.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        }

        tx.commit().await.map_err(backend)?;
        Ok(())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDER} WHERE user_id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        match row {
            Some(row) => Ok(Some(self.assemble(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDER} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        match row {
            Some(row) => Ok(Some(self.assemble(row).await?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        // order_items go with the order via ON DELETE CASCADE
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }
}
