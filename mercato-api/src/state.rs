use std::sync::Arc;

use mercato_order::OrderOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderOrchestrator>,
}
