//! HD6224A serial bridge: entry point.
//!
//! Loads the device list, opens one serial connection per configured switch,
//! and then reads host commands from stdin until `quit`, Ctrl-C, or SIGINT.
//!
//! # Usage
//!
//! ```text
//! hd6224-bridge [OPTIONS]
//!
//! Options:
//!   --config    <PATH>    Config file [default: platform config dir]
//!   --log-level <LEVEL>   error | warn | info | debug | trace
//!   --init                Write an example config file and exit
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable         | Description                                  |
//! |------------------|----------------------------------------------|
//! | `HD6224_CONFIG`  | Same as `--config`                           |
//! | `HD6224_LOG`     | Same as `--log-level`                        |
//! | `RUST_LOG`       | Full `tracing` filter; wins over both above  |
//!
//! # Architecture overview
//!
//! ```text
//! stdin (one command per line)
//!       ↓
//! infrastructure/command_bridge   parse + dispatch
//!       ↓
//! application/device_registry     name / index lookup
//!       ↓
//! application/device_controller   power, input selection
//!       ↓
//! infrastructure/serial           serialport-backed transport
//!       ↓
//! HD6224A  (//mN\r\n)
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, info_span, warn};
use tracing_subscriber::EnvFilter;

use hd6224_bridge::application::device_controller::DeviceController;
use hd6224_bridge::application::device_registry::DeviceRegistry;
use hd6224_bridge::application::host::HostCapabilities;
use hd6224_bridge::infrastructure::command_bridge::{handle_line, Outcome};
use hd6224_bridge::infrastructure::serial::SerialPortTransport;
use hd6224_bridge::infrastructure::storage::config::{self, AppConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Serial control bridge for BlackBox HD6224A KVM switches.
#[derive(Debug, Parser)]
#[command(
    name = "hd6224-bridge",
    about = "Power and input control for BlackBox HD6224A KVM switches over RS-232",
    version
)]
struct Cli {
    /// Path to the TOML config file.
    ///
    /// Defaults to `config.toml` in the platform config directory.  A missing
    /// file is treated as an empty device list.
    #[arg(long, env = "HD6224_CONFIG")]
    config: Option<PathBuf>,

    /// Log level, overriding `[bridge] log_level` from the config file.
    #[arg(long, env = "HD6224_LOG")]
    log_level: Option<String>,

    /// Write an example config to the config path and exit.
    ///
    /// Refuses to overwrite an existing file.
    #[arg(long)]
    init: bool,
}

impl Cli {
    fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => config::config_file_path().context("no --config given"),
        }
    }
}

fn write_example_config(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        bail!("{} already exists; not overwriting", path.display());
    }
    config::save_config_to(path, &AppConfig::example())
        .with_context(|| format!("failed to write config to {}", path.display()))?;
    println!("wrote example config to {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config_path()?;
    if cli.init {
        return write_example_config(&config_path);
    }
    let app_config = config::load_config_from(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    // RUST_LOG wins; otherwise the CLI level, then the config file level.
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| app_config.bridge.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level)),
        )
        .init();

    info!(devices = app_config.devices.len(), "HD6224 bridge starting");
    if app_config.devices.is_empty() {
        warn!("no devices configured");
    }

    let (host, mut events) = HostCapabilities::channel(info_span!("hd6224"));
    let mut registry = DeviceRegistry::new();

    for device in &app_config.devices {
        // A controller opens its port on construction; reject duplicates first.
        if registry.contains_name(&device.name) {
            warn!(device = %device.name, "duplicate device name; entry skipped");
            continue;
        }
        let (transport, mut inbound) = SerialPortTransport::new(device.serial_settings());

        // The switch's replies carry no information the bridge acts on.
        let name = device.name.clone();
        tokio::spawn(async move {
            while let Some(line) = inbound.recv().await {
                debug!(device = %name, %line, "ignored inbound line");
            }
        });

        registry.add(DeviceController::new(
            device.to_profile(),
            Box::new(transport),
            host.clone(),
        ));
    }
    drop(host);

    // ── Host event pump ───────────────────────────────────────────────────────
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!(?event, "host notified");
        }
    });

    info!("HD6224 bridge ready.  Type `help` for commands, Ctrl-C to exit.");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                log_shutdown(result);
                break;
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        info!("stdin closed; running until Ctrl-C");
                        log_shutdown(ctrl_c.as_mut().await);
                        break;
                    }
                    Err(e) => {
                        warn!("stdin read failed: {e}; running until Ctrl-C");
                        log_shutdown(ctrl_c.as_mut().await);
                        break;
                    }
                };
                match handle_line(&mut registry, &line) {
                    Outcome::Reply(reply) => {
                        for text in reply {
                            println!("{text}");
                        }
                    }
                    Outcome::Quit => {
                        info!("quit requested");
                        break;
                    }
                }
            }
        }
    }

    registry.power_off_all();
    info!("HD6224 bridge stopped");
    Ok(())
}

fn log_shutdown(signal: std::io::Result<()>) {
    match signal {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => error!("failed to listen for shutdown signal: {e}"),
    }
}
