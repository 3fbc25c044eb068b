#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use resource_schedule::{AllocationStore, InMemoryAllocationStore, SchedulingConfig, http_api};
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resource_schedule=info,http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = std::env::var("RESOURCE_SCHEDULE_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let config = match std::env::var("RESOURCE_SCHEDULE_CONFIG") {
        Ok(path) => SchedulingConfig::load(path)?.with_env_overrides()?,
        Err(_) => SchedulingConfig::from_env()?,
    };

    let store: Arc<dyn AllocationStore> = match std::env::var("RESOURCE_SCHEDULE_DB") {
        #[cfg(feature = "sqlite")]
        Ok(path) => Arc::new(resource_schedule::SqliteAllocationStore::new(path)?),
        _ => Arc::new(InMemoryAllocationStore::new()),
    };

    tracing::info!(%addr, "resource-schedule HTTP API listening");
    http_api::serve(addr, http_api::AppState::new(store, config)).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
