use std::time::Duration;

use clap::Parser;
use scenedeck::client;

#[derive(Parser, Debug)]
#[command(name = "scenedeck", about = "Scene editing surface sync client")]
struct Cli {
    /// WebSocket URL of the scene process.
    #[arg(long, env = "SCENEDECK_URL", default_value = "ws://127.0.0.1:4600/ws")]
    url: String,

    /// Window label used to claim resize events.
    #[arg(long, env = "SCENEDECK_WINDOW", default_value = "scene")]
    window: String,

    /// Heartbeat interval in milliseconds.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    tracing::info!(url = %cli.url, window = %cli.window, "scenedeck starting");

    let interval = Duration::from_millis(cli.tick_ms.max(1));
    if let Err(error) = client::run(&cli.url, &cli.window, interval).await {
        tracing::error!(%error, "sync loop failed");
        std::process::exit(1);
    }
}
