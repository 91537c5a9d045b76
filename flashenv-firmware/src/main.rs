//! flashenv - Boot firmware
//!
//! Mounts the config partition, seeds `/config.env` on first boot, loads it
//! over the compiled-in defaults and reports the resulting configuration.
//! Every storage failure is logged and the device keeps running on
//! whatever configuration it has.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use flashenv_core::{ConfigDefaults, ConfigKey, ConfigStore, DefaultConfigStatus};

use crate::storage::ConfigFileSystem;

mod storage;

/// Interval between liveness log lines
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(60);

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("flashenv firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let fs = storage::config_filesystem(p.FLASH, p.DMA_CH0);
    let mut store = ConfigStore::new(fs, ConfigDefaults::default());

    load_config(&mut store);
    log_config(&store);

    loop {
        Timer::after(HEARTBEAT_INTERVAL).await;
        debug!("Running, reporting to {}", store.server_url());
    }
}

/// Mount storage, seed the default file if needed, then load it
///
/// Falls back to the defaults at every step.
fn load_config(store: &mut ConfigStore<ConfigFileSystem<'_>>) {
    if let Err(e) = store.initialize_storage() {
        warn!("Storage unavailable: {:?}, using default configuration", e);
        return;
    }

    match store.create_default_config() {
        Ok(DefaultConfigStatus::Created) => info!("Wrote default {}", store.path()),
        Ok(DefaultConfigStatus::AlreadyExists) => {}
        Err(e) => warn!("Failed to write default config: {:?}", e),
    }

    match store.load() {
        Ok(report) => {
            for key in report.missing() {
                warn!("{} missing from {}, using default", key.as_str(), store.path());
            }
        }
        Err(e) if e.is_expected() => info!("No config file, using default configuration"),
        Err(e) => warn!("Failed to load configuration: {:?}, using defaults", e),
    }
}

/// Log the active configuration, secrets by length only
fn log_config(store: &ConfigStore<ConfigFileSystem<'_>>) {
    for key in ConfigKey::ALL {
        let value = store.values().get(key);
        if key.is_secret() {
            info!("{}: {} bytes", key.as_str(), value.len());
        } else {
            info!("{}: {}", key.as_str(), value);
        }
    }

    if store.ssid() == store.defaults().ssid {
        warn!("WiFi SSID is still the placeholder, edit {}", store.path());
    }
}
