//! In-memory configuration values

use crate::bounded::BoundedString;

use super::defaults::{ConfigDefaults, PASSWORD_MAX_LEN, SERVER_URL_MAX_LEN, SSID_MAX_LEN};
use super::keys::ConfigKey;

/// The three configuration fields, each with a fixed capacity
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigValues {
    ssid: BoundedString<SSID_MAX_LEN>,
    password: BoundedString<PASSWORD_MAX_LEN>,
    server_url: BoundedString<SERVER_URL_MAX_LEN>,
}

impl ConfigValues {
    /// Values initialized from `defaults`, truncated to field capacity
    pub fn from_defaults(defaults: &ConfigDefaults) -> Self {
        Self {
            ssid: BoundedString::from_truncated(defaults.ssid),
            password: BoundedString::from_truncated(defaults.password),
            server_url: BoundedString::from_truncated(defaults.server_url),
        }
    }

    /// WiFi network name
    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    /// WiFi passphrase
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Endpoint the device reports to
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Value of a field by key
    pub fn get(&self, key: ConfigKey) -> &str {
        match key {
            ConfigKey::WifiSsid => &self.ssid,
            ConfigKey::WifiPassword => &self.password,
            ConfigKey::ServerUrl => &self.server_url,
        }
    }

    /// Overwrite a field, returning `true` if `value` was truncated
    pub(crate) fn set(&mut self, key: ConfigKey, value: &str) -> bool {
        match key {
            ConfigKey::WifiSsid => self.ssid.copy_truncating(value),
            ConfigKey::WifiPassword => self.password.copy_truncating(value),
            ConfigKey::ServerUrl => self.server_url.copy_truncating(value),
        }
    }
}

impl Default for ConfigValues {
    fn default() -> Self {
        Self::from_defaults(&ConfigDefaults::default())
    }
}
