pub mod memory;
pub mod models;
pub mod notification;
pub mod orchestrator;
pub mod pricing;
pub mod repository;
pub mod settlement;

pub use models::{Address, CartItem, Order, OrderStatus, ShippingCost};
pub use orchestrator::{NewOrder, OrderError, OrderOrchestrator};
pub use repository::{
    AddressDirectory, CartRepository, OrderRepository, ShippingCostResolver, StoreError,
};
pub use settlement::{ConfirmationItem, PaymentConfirmation};
