use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mercato_order::models::{CartItem, Order, OrderStatus};
use mercato_order::{NewOrder, PaymentConfirmation};

use crate::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: Uuid,
    pub address_id: Uuid,
    pub customer_name: String,
    pub phone_number: String,
    pub email: String,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address_id: Uuid,
    pub shipping_cost_cents: i64,
    pub price_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub order_date: chrono::DateTime<chrono::Utc>,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub items: Vec<CartItem>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            address_id: order.address_id,
            shipping_cost_cents: order.shipping_cost_cents,
            price_cents: order.price_cents,
            discount_cents: order.discount_cents,
            total_cents: order.total_cents,
            order_date: order.order_date,
            status: order.status,
            shipping_address: order.shipping_address,
            items: order.items,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /orders
/// Turn the caller's cart into a priced, pending order
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let order = state
        .orders
        .create_order(NewOrder {
            user_id: req.user_id,
            address_id: req.address_id,
            customer_name: req.customer_name,
            phone_number: req.phone_number,
            email: req.email,
            note: req.note,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// DELETE /orders/{id}
/// Remove a pending order; refused while the owner's cart has items
pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.orders.delete_order(order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /orders/{id}/payment
/// Settle the order: confirm, release the cart, retire the record
pub async fn process_payment(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<PaymentConfirmation>, ApiError> {
    let confirmation = state.orders.process_payment(order_id).await?;
    Ok(Json(confirmation))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/{id}", delete(delete_order))
        .route("/orders/{id}/payment", post(process_payment))
}
