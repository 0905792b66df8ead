use std::net::SocketAddr;
use std::sync::Arc;

use mercato_api::{app, AppState};
use mercato_order::OrderOrchestrator;
use mercato_store::{
    Config, Db, PgAddressDirectory, PgCartRepository, PgOrderRepository, PgShippingCostResolver,
    SmtpNotificationGateway,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mercato_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!("Starting Mercato API on port {}", config.server.port);

    let db = Db::connect(&config.database.url, config.database.max_connections).await?;
    db.migrate().await?;

    // Every collaborator is built once here and injected as a trait
    // object; nothing is initialized lazily.
    let orchestrator = OrderOrchestrator::new(
        Arc::new(PgAddressDirectory::new(db.pool.clone())),
        Arc::new(PgShippingCostResolver::new(db.pool.clone())),
        Arc::new(PgCartRepository::new(db.pool.clone())),
        Arc::new(PgOrderRepository::new(db.pool.clone())),
        Arc::new(SmtpNotificationGateway::new(&config.smtp)?),
    );

    let state = AppState {
        orders: Arc::new(orchestrator),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
