//! ringlog Server Binary
//!
//! Line-oriented TCP accumulator server with an in-memory ring log.

use clap::Parser;
use ringlog::config::ServerConfig;
use ringlog::server::AccumulatorServer;
use ringlog::RingLogError;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "ringlog")]
#[command(about = "Line-oriented TCP accumulator server")]
#[command(version)]
struct Args {
    /// Run as a daemon: fork after bind, parent exits, child detaches
    #[arg(short, long)]
    daemon: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "config/server.toml")]
    config: PathBuf,

    /// Port override
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(if args.verbose {
            "ringlog=debug,info"
        } else {
            "ringlog=info,warn,error"
        })
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("Starting ringlog v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = if args.config.exists() {
        ServerConfig::from_file(&args.config)?
    } else {
        info!("Config file not found, using defaults");
        ServerConfig::default()
    };

    // Override config with CLI arguments
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    info!("Port: {}", config.server.port);
    info!("Ring capacity: {} records", config.log.ring_capacity);
    info!("Timestamps enabled: {}", config.timestamps.enabled);

    // Bind before any fork so setup failures exit non-zero in the foreground.
    let server = AccumulatorServer::bind(config)?;

    if args.daemon {
        daemonize()?;
    }

    // The runtime starts only after the fork; forked children must not
    // inherit runtime threads.
    let runtime = tokio::runtime::Runtime::new()?;
    if let Err(e) = runtime.block_on(run(server)) {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("ringlog stopped");
    Ok(())
}

async fn run(server: AccumulatorServer) -> ringlog::Result<()> {
    let shutdown = server.shutdown_handle();

    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Caught signal, exiting");
        shutdown.shutdown();
    });

    server.start().await
}

/// Resolve on SIGINT or SIGTERM, whichever arrives first.
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(e) => {
            error!("Failed to install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

/// Fork once and continue in a detached child session. The parent exits
/// with success; bind errors were already surfaced before this point.
fn daemonize() -> ringlog::Result<()> {
    match unsafe { libc::fork() } {
        -1 => Err(RingLogError::Server(format!(
            "fork failed: {}",
            std::io::Error::last_os_error()
        ))),
        0 => {
            if unsafe { libc::setsid() } == -1 {
                return Err(RingLogError::Server(format!(
                    "setsid failed: {}",
                    std::io::Error::last_os_error()
                )));
            }
            Ok(())
        }
        _ => std::process::exit(0),
    }
}
