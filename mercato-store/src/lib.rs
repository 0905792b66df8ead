pub mod app_config;
pub mod database;
pub mod mailer;
pub mod pg;

pub use app_config::Config;
pub use database::Db;
pub use mailer::SmtpNotificationGateway;
pub use pg::{PgAddressDirectory, PgCartRepository, PgOrderRepository, PgShippingCostResolver};
