use rankbias_web::{AppState, router};

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let state = AppState::live().inspect_err(|e| {
        log::error!("Failed to init pipeline: {e:?}");
    })?;

    let address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.into());
    let tcp_listener = tokio::net::TcpListener::bind(&address).await?;

    log::info!("Starting rankbias server on address: {}", address);

    axum::serve(tcp_listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {e}");
            }
        })
        .await?;

    Ok(())
}
