use anyhow::Context;
use clap::Parser;
use gamehub_service::{router, spawn_sweeper, AppState, Hub};
use gamehub_types::{ENTRY_FEE_LAMPORTS, GAME_TREASURY_ADDRESS};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gamehub-service", about = "Gamehub session/points/airdrop service")]
struct Args {
    /// Listen host
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Listen port
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Entry fee per play attempt, in lamports
    #[arg(long, default_value_t = ENTRY_FEE_LAMPORTS)]
    entry_fee: u64,

    /// Treasury address entry fees are paid to
    #[arg(long, default_value = GAME_TREASURY_ADDRESS)]
    treasury: String,

    /// Session timer sweep period in milliseconds
    #[arg(long, default_value_t = 250)]
    sweep_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let state = AppState::new(Hub::new(args.entry_fee, args.treasury));
    spawn_sweeper(state.hub.clone(), Duration::from_millis(args.sweep_ms));

    let app = router(state);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("invalid listen addr")?;
    info!(%addr, entry_fee = args.entry_fee, "gamehub service listening");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
