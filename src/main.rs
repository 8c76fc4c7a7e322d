use tajbyhand_server::{Config, Server, ServerState, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    dotenv::dotenv().ok();
    tajbyhand_server::init_logger();

    print_banner();
    tracing::info!("TajByHand server starting...");

    // 2. Configuration
    let config = Config::from_env();

    // 3. State (database, JWT, rate limiter, admin seed)
    let state = ServerState::initialize(&config).await?;

    // 4. HTTP server
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
