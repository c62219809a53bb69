use luckypacket_blinks::config::Config;
use luckypacket_blinks::contract::RpcContract;
use luckypacket_blinks::router;
use luckypacket_blinks::state::AppState;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let config = Config::from_env().expect("Invalid configuration");
    let bind_addr = config.bind_addr();

    tracing::info!("RPC endpoint: {}", config.rpc_url);
    tracing::info!("Base URL: {}", config.base_url);
    tracing::info!("Cluster: {}", config.cluster.label());
    if config.is_configured() {
        tracing::info!("Lucky packet program: {}", config.program_id);
    } else {
        tracing::warn!("LUCKY_PACKET_PROGRAM_ID not set, actions will show a setup notice");
    }
    tracing::info!("Listening on {bind_addr}");

    let rpc = Arc::new(RpcClient::new_with_commitment(
        config.rpc_url.clone(),
        CommitmentConfig::confirmed(),
    ));
    let contract = Arc::new(RpcContract::new(rpc, config.program_id));
    let app = router::build_router(AppState::with_contract(config, contract));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+C received, shutting down"),
        _ = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
