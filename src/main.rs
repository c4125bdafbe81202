use std::time::Duration;

use clap::Parser;

use syspulse::core::monitor::{spawn_monitor, SysinfoProbe};
use syspulse::server::run_server;

/// Real-time system monitoring backend.
#[derive(Parser, Debug)]
#[command(name = "syspulse", version, about)]
struct Cli {
    /// Listen address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Listen port
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Sampling interval in milliseconds
    #[arg(long, default_value_t = 1000, value_name = "MS")]
    interval_ms: u64,
}

#[tokio::main]
async fn main() -> syspulse::Result<()> {
    syspulse::init_logging();

    let cli = Cli::parse();
    if cli.interval_ms == 0 {
        return Err(syspulse::SysPulseError::config(
            "sampling interval must be at least 1 ms",
        ));
    }

    let monitor = spawn_monitor(
        Box::new(SysinfoProbe::new()),
        Duration::from_millis(cli.interval_ms),
    );

    run_server(monitor, &cli.host, cli.port).await
}
