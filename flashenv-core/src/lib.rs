//! Board-agnostic configuration loader for flashenv devices
//!
//! This crate contains all logic that does not depend on a specific storage
//! backend:
//!
//! - Fixed-capacity strings with truncating copy
//! - The `KEY=VALUE` env file line parser
//! - Defaults and the default file template
//! - [`ConfigStore`], which loads the env file over the defaults
//!
//! Storage is reached through the [`flashenv_hal::FileSystem`] trait.
//!
//! # Example
//!
//! ```ignore
//! let mut store = ConfigStore::new(fs, ConfigDefaults::default());
//! let _ = store.initialize_storage();
//! let _ = store.create_default_config();
//! let _ = store.load();
//! wifi.connect(store.ssid(), store.password());
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

// Must come first so the logging macros are visible in later modules
#[macro_use]
mod fmt;

pub mod bounded;
pub mod config;
pub mod error;
pub mod parser;
pub mod store;

#[cfg(test)]
mod testing;

pub use bounded::BoundedString;
pub use config::{ConfigDefaults, ConfigKey, ConfigValues, CONFIG_PATH};
pub use error::ConfigError;
pub use store::{ConfigStore, DefaultConfigStatus, LoadReport};
