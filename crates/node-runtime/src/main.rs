//! # Forwarding Daemon
//!
//! Loads the configuration, brings up the face system and then runs the
//! processing loop on a single thread until Ctrl+C.
//!
//! ## Startup Sequence
//!
//! 1. Resolve and load the config file (argument, `FWD_CONFIG`, `fwd.toml`)
//! 2. Install logging (`RUST_LOG`, else `runtime.log_level`)
//! 3. Register protocol factories and apply `[face_system]` in two phases
//! 4. Request the `[[runtime.faces]]`
//! 5. Loop: face events, input polling, SIGHUP reload, Ctrl+C shutdown

use std::path::Path;

use anyhow::{Context, Result};
use face_system::FaceSystem;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use node_runtime::config::CONFIG_ENV;
use node_runtime::{resolve_config_path, NodeConfig, NodeRuntime};

fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install tracing subscriber")
}

/// Re-read the config file and apply its `[face_system]` section.
fn reload_from(path: &Path, runtime: &mut NodeRuntime) {
    info!(path = %path.display(), "SIGHUP received, reloading configuration");
    match NodeConfig::load(path) {
        Ok(config) => {
            // errors are logged by the runtime with the phase that failed
            let _ = runtime.reload(&config);
        }
        Err(e) => error!(error = %format!("{e:#}"), "Configuration reload failed"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let path = resolve_config_path(std::env::args().nth(1), std::env::var(CONFIG_ENV).ok());
    let config = NodeConfig::load(&path)?;
    init_logging(&config.runtime.log_level)?;

    info!("===========================================");
    info!("  Forwarding Daemon v{}", env!("CARGO_PKG_VERSION"));
    info!("  Config: {}", path.display());
    info!("===========================================");

    let (mut runtime, mut events) = NodeRuntime::new(FaceSystem::with_default_factories());
    runtime
        .reload(&config)
        .context("initial face system configuration rejected")?;
    runtime.create_static_faces(&config);

    let mut hangup = signal(SignalKind::hangup()).context("failed to install SIGHUP handler")?;
    let mut poll = tokio::time::interval(config.runtime.poll_interval());
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!("Daemon is running. Press Ctrl+C to stop.");
    loop {
        tokio::select! {
            Some(event) = events.recv() => runtime.handle_event(event),
            _ = poll.tick() => {
                runtime.poll_faces();
            }
            _ = hangup.recv() => reload_from(&path, &mut runtime),
            result = &mut shutdown => {
                result.context("failed to listen for Ctrl+C")?;
                break;
            }
        }
    }

    info!("Initiating graceful shutdown...");
    runtime.shutdown();
    info!("Shutdown complete");
    Ok(())
}
