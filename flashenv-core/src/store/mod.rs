//! Configuration store
//!
//! [`ConfigStore`] owns the configuration fields and the filesystem they are
//! persisted on. It starts out holding the injected defaults, overwrites
//! them field by field from the env file on [`load`](ConfigStore::load), and
//! can seed the file with a default template on first boot.
//!
//! Every failure is absorbed: operations return a [`ConfigError`] and log a
//! diagnostic, and the fields keep their previous values.

mod file;
mod report;

pub use report::LoadReport;

use flashenv_hal::{FileSystem, Line, OpenMode};

use crate::config::{ConfigDefaults, ConfigKey, ConfigValues, DefaultTemplate, CONFIG_PATH};
use crate::error::ConfigError;
use crate::parser::{self, Line as ParsedLine};

use file::OpenFile;

/// Outcome of [`ConfigStore::create_default_config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DefaultConfigStatus {
    /// The file was missing and has been written
    Created,
    /// The file was already there and was left untouched
    AlreadyExists,
}

/// WiFi and server configuration backed by an env file
pub struct ConfigStore<F: FileSystem> {
    fs: F,
    defaults: ConfigDefaults,
    path: &'static str,
    values: ConfigValues,
}

impl<F: FileSystem> ConfigStore<F> {
    /// Create a store for [`CONFIG_PATH`] holding `defaults`
    pub fn new(fs: F, defaults: ConfigDefaults) -> Self {
        Self::with_path(fs, defaults, CONFIG_PATH)
    }

    /// Create a store for a config file at `path`
    pub fn with_path(fs: F, defaults: ConfigDefaults, path: &'static str) -> Self {
        Self {
            fs,
            values: ConfigValues::from_defaults(&defaults),
            defaults,
            path,
        }
    }

    /// Mount the backing filesystem, formatting it if it cannot be mounted
    ///
    /// A failure is not fatal: the store keeps serving its defaults.
    pub fn initialize_storage(&mut self) -> Result<(), ConfigError> {
        self.fs.mount(true).map_err(|e| {
            error!("Failed to mount storage: {:?}", e);
            ConfigError::Mount(e)
        })?;

        debug!("Storage mounted");
        Ok(())
    }

    /// Load the config file, overwriting each field whose key is present
    ///
    /// Returns `Ok` once the whole file has been read, however many lines
    /// were malformed and however many keys were found. Fields whose key is
    /// absent keep their current value.
    pub fn load(&mut self) -> Result<LoadReport, ConfigError> {
        if !self.fs.exists(self.path) {
            info!("Config file not found, using default values");
            return Err(ConfigError::NotFound);
        }

        let mut file = OpenFile::open(&mut self.fs, self.path, OpenMode::Read).map_err(|e| {
            warn!("Failed to open config file: {:?}", e);
            ConfigError::Open(e)
        })?;

        info!("Reading configuration from {}", self.path);

        let mut report = LoadReport::new();
        let mut line = Line::new();

        loop {
            match file.read_line(&mut line) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    warn!("Failed to read config file: {:?}", e);
                    return Err(ConfigError::Read(e));
                }
            }

            match parser::classify(&line) {
                ParsedLine::Blank | ParsedLine::Comment => {}
                ParsedLine::Malformed => {
                    debug!("Skipping malformed line");
                    report.record_skipped();
                }
                ParsedLine::Entry { key, value } => match ConfigKey::from_key(key) {
                    Some(key) => {
                        let truncated = self.values.set(key, value);
                        report.record_applied(key, truncated);
                        info!("{} loaded", key.as_str());
                        if truncated {
                            warn!("{} truncated to {} bytes", key.as_str(), key.max_len());
                        }
                    }
                    None => {
                        debug!("Ignoring unknown key {}", key);
                        report.record_unknown();
                    }
                },
            }
        }

        if let Err(e) = file.finish() {
            warn!("Failed to close config file: {:?}", e);
        }

        log_load_summary(&report);
        Ok(report)
    }

    /// Write the default config file if none exists
    ///
    /// An existing file is never touched, so user edits survive.
    pub fn create_default_config(&mut self) -> Result<DefaultConfigStatus, ConfigError> {
        if self.fs.exists(self.path) {
            info!("Config file already exists");
            return Ok(DefaultConfigStatus::AlreadyExists);
        }

        let mut file = OpenFile::open(&mut self.fs, self.path, OpenMode::Write).map_err(|e| {
            error!("Failed to create config file: {:?}", e);
            ConfigError::Open(e)
        })?;

        for line in DefaultTemplate::new(&self.defaults) {
            file.write_line(&line).map_err(|e| {
                error!("Failed to write config file: {:?}", e);
                ConfigError::Write(e)
            })?;
        }

        file.finish().map_err(|e| {
            error!("Failed to save config file: {:?}", e);
            ConfigError::Write(e)
        })?;

        info!("Default config file created");
        Ok(DefaultConfigStatus::Created)
    }

    /// WiFi network name
    pub fn ssid(&self) -> &str {
        self.values.ssid()
    }

    /// WiFi passphrase
    pub fn password(&self) -> &str {
        self.values.password()
    }

    /// Endpoint the device reports to
    pub fn server_url(&self) -> &str {
        self.values.server_url()
    }

    /// All current values
    pub fn values(&self) -> &ConfigValues {
        &self.values
    }

    /// Defaults this store was created with
    pub fn defaults(&self) -> &ConfigDefaults {
        &self.defaults
    }

    /// Path of the config file
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Access the underlying filesystem
    pub fn fs_mut(&mut self) -> &mut F {
        &mut self.fs
    }

    /// Consume the store and return the underlying filesystem
    pub fn into_inner(self) -> F {
        self.fs
    }
}

/// Log a summary of a completed load
fn log_load_summary(report: &LoadReport) {
    info!(
        "Configuration loaded: {} of {} keys",
        report.applied.len(),
        ConfigKey::ALL.len()
    );
    for key in report.missing() {
        debug!("  {} not set, keeping current value", key.as_str());
    }
    if report.skipped > 0 {
        debug!("  {} malformed line(s) skipped", report.skipped);
    }
}
